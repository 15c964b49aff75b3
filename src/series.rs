use chrono::NaiveDate;

use num_traits::Float;

use smartstring::alias::{String as SmartString};

use crate::record::Record;
use crate::{FIRST_YEAR, LAST_YEAR};


/// Linear interpolation between present neighbours. Gaps wider than
/// `max_gap` slots are left untouched; `None` means no limit. Leading and
/// trailing gaps are never touched here, that is what [`hold_edges`] is for.
pub fn interpolate_gaps<V: Float>(values: &mut [Option<V>], max_gap: Option<usize>) {
	let mut prev: Option<usize> = None;
	for i in 0..values.len() {
		if values[i].is_none() {
			continue
		}
		if let Some(p) = prev {
			let gap = i - p - 1;
			if gap > 0 && max_gap.map(|limit| gap <= limit).unwrap_or(true) {
				// both endpoints checked present above
				let v0 = values[p].unwrap();
				let v1 = values[i].unwrap();
				let span = V::from(i - p).unwrap();
				for j in (p + 1)..i {
					let t = V::from(j - p).unwrap() / span;
					values[j] = Some(v0 + (v1 - v0) * t);
				}
			}
		}
		prev = Some(i);
	}
}

/// Flat extrapolation: leading slots take the first present value, trailing
/// slots the last one. A slice with no present value stays untouched.
pub fn hold_edges<V: Copy>(values: &mut [Option<V>]) {
	let first = match values.iter().position(|v| v.is_some()) {
		Some(i) => i,
		None => return,
	};
	let lead = values[first].unwrap();
	for slot in values[..first].iter_mut() {
		*slot = Some(lead);
	}
	// a present slot exists, so rposition cannot fail
	let last = values.iter().rposition(|v| v.is_some()).unwrap();
	let tail = values[last].unwrap();
	for slot in values[last + 1..].iter_mut() {
		*slot = Some(tail);
	}
}

pub fn round_values(values: &mut [Option<f64>], decimals: i32) {
	let scale = 10f64.powi(decimals);
	for v in values.iter_mut() {
		if let Some(x) = v.as_mut() {
			*x = (*x * scale).round() / scale;
		}
	}
}


/// Dense yearly series: one slot per integer year from `first_year` on.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
	location: SmartString,
	first_year: i32,
	values: Vec<Option<f64>>,
}

impl YearSeries {
	pub fn new(location: SmartString, first_year: i32, last_year: i32) -> Self {
		assert!(last_year >= first_year);
		let len = (last_year - first_year + 1) as usize;
		let mut values = Vec::with_capacity(len);
		values.resize(len, None);
		Self{
			location,
			first_year,
			values,
		}
	}

	/// A series over the full study window [FIRST_YEAR, LAST_YEAR].
	pub fn study_range(location: SmartString) -> Self {
		Self::new(location, FIRST_YEAR, LAST_YEAR)
	}

	#[inline(always)]
	pub fn year_index(&self, year: i32) -> Option<usize> {
		let offset = year - self.first_year;
		if offset < 0 || offset as usize >= self.values.len() {
			return None
		}
		Some(offset as usize)
	}

	#[inline(always)]
	pub fn index_year(&self, i: usize) -> i32 {
		self.first_year + i as i32
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn get(&self, year: i32) -> Option<f64> {
		self.values[self.year_index(year)?]
	}

	/// Returns false when the year falls outside the series range.
	pub fn set(&mut self, year: i32, value: f64) -> bool {
		match self.year_index(year) {
			Some(i) => {
				self.values[i] = Some(value);
				true
			},
			None => false,
		}
	}

	/// Interpolate interior gaps, then hold the nearest value across the
	/// edges. A fully populated series comes out unchanged.
	pub fn fill(&mut self) {
		interpolate_gaps(&mut self.values[..], None);
		hold_edges(&mut self.values[..]);
	}

	pub fn is_complete(&self) -> bool {
		self.values.iter().all(|v| v.is_some())
	}

	pub fn iter<'x>(&'x self) -> impl Iterator<Item = (i32, Option<f64>)> + 'x {
		let first_year = self.first_year;
		self.values.iter().enumerate().map(move |(i, v)| (first_year + i as i32, *v))
	}
}


/// Dense daily series: one slot per calendar day from `start` to the last
/// observed day, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySeries {
	location: SmartString,
	start: NaiveDate,
	values: Vec<Option<f64>>,
}

impl DaySeries {
	pub fn new(location: SmartString, start: NaiveDate, last: NaiveDate) -> Self {
		let len = (last - start).num_days();
		assert!(len >= 0);
		let len = len as usize + 1;
		let mut values = Vec::with_capacity(len);
		values.resize(len, None);
		Self{
			location,
			start,
			values,
		}
	}

	/// Build a series spanning the observed min/max date of `records`.
	/// Yearly records are ignored; duplicate dates merge by arithmetic mean.
	/// Returns None when no record carries a calendar date.
	pub fn from_records(records: &[Record]) -> Option<Self> {
		let mut start: Option<NaiveDate> = None;
		let mut end: Option<NaiveDate> = None;
		for rec in records {
			let day = match rec.date.as_day() {
				Some(d) => d,
				None => continue,
			};
			start = Some(start.map(|s| s.min(day)).unwrap_or(day));
			end = Some(end.map(|e| e.max(day)).unwrap_or(day));
		}
		let (start, end) = (start?, end?);
		let mut series = Self::new(SmartString::new(), start, end);
		let mut sums = vec![0.0f64; series.values.len()];
		let mut counts = vec![0u32; series.values.len()];
		for rec in records {
			let day = match rec.date.as_day() {
				Some(d) => d,
				None => continue,
			};
			// in range by construction
			let i = series.date_index(day).unwrap();
			sums[i] += rec.value;
			counts[i] += 1;
			if series.location.is_empty() {
				// one location per file; forward/backward filling a single
				// value amounts to taking the first one present
				series.location = rec.location.clone();
			}
		}
		for (i, n) in counts.iter().enumerate() {
			if *n > 0 {
				series.values[i] = Some(sums[i] / *n as f64);
			}
		}
		Some(series)
	}

	#[inline(always)]
	pub fn date_index(&self, other: NaiveDate) -> Option<usize> {
		let days = (other - self.start).num_days();
		if days < 0 || days as usize >= self.values.len() {
			return None
		}
		return Some(days as usize)
	}

	#[inline(always)]
	pub fn index_date(&self, i: usize) -> Option<NaiveDate> {
		if i >= self.values.len() {
			return None
		}
		return Some(self.start + chrono::Duration::days(i as i64))
	}

	#[inline(always)]
	pub fn start(&self) -> NaiveDate {
		self.start
	}

	#[inline(always)]
	pub fn end(&self) -> NaiveDate {
		self.start + chrono::Duration::days(self.values.len() as i64 - 1)
	}

	pub fn location(&self) -> &str {
		&self.location
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn get(&self, date: NaiveDate) -> Option<f64> {
		self.values[self.date_index(date)?]
	}

	pub fn missing(&self) -> usize {
		self.values.iter().filter(|v| v.is_none()).count()
	}

	pub fn is_complete(&self) -> bool {
		self.missing() == 0
	}

	pub fn interpolate(&mut self, max_gap: Option<usize>) {
		interpolate_gaps(&mut self.values[..], max_gap);
	}

	pub fn hold_edges(&mut self) {
		hold_edges(&mut self.values[..]);
	}

	pub fn round(&mut self, decimals: i32) {
		round_values(&mut self.values[..], decimals);
	}

	/// The sub-series covering `start..=end`, or None when the requested
	/// window does not lie fully inside this series.
	pub fn clipped(&self, start: NaiveDate, end: NaiveDate) -> Option<Self> {
		let lo = self.date_index(start)?;
		let hi = self.date_index(end)?;
		if hi < lo {
			return None
		}
		Some(Self{
			location: self.location.clone(),
			start,
			values: self.values[lo..=hi].to_vec(),
		})
	}

	pub fn iter<'x>(&'x self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + 'x {
		let start = self.start;
		self.values.iter().enumerate().map(move |(i, v)| (start + chrono::Duration::days(i as i64), *v))
	}
}


#[cfg(test)]
mod test {
	use super::*;

	use crate::record::ObservationDate;

	fn day(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn interpolation_is_linear() {
		let mut series = YearSeries::study_range("Loudoun County, VA".into());
		series.set(2000, 10.0);
		series.set(2005, 20.0);
		series.fill();
		assert_eq!(series.get(2001), Some(12.0));
		assert_eq!(series.get(2002), Some(14.0));
		assert_eq!(series.get(2003), Some(16.0));
		assert_eq!(series.get(2004), Some(18.0));
	}

	#[test]
	fn edges_hold_nearest_value() {
		let mut series = YearSeries::study_range("Howard County, MD".into());
		series.set(2003, 42.0);
		series.set(2020, 7.0);
		series.fill();
		for year in 2000..=2002 {
			assert_eq!(series.get(year), Some(42.0));
		}
		for year in 2021..=2023 {
			assert_eq!(series.get(year), Some(7.0));
		}
	}

	#[test]
	fn filled_series_is_complete_and_sorted() {
		let mut series = YearSeries::study_range("Washington, DC".into());
		series.set(2010, 1.0);
		series.fill();
		assert!(series.is_complete());
		let years: Vec<i32> = series.iter().map(|(y, _)| y).collect();
		assert_eq!(years.len(), 24);
		assert_eq!(years[0], 2000);
		assert_eq!(years[23], 2023);
		assert!(years.windows(2).all(|w| w[0] < w[1]));
	}

	#[test]
	fn fill_is_idempotent() {
		let mut series = YearSeries::study_range("Frederick County, MD".into());
		series.set(2001, 5.0);
		series.set(2012, 11.0);
		series.fill();
		let once = series.clone();
		series.fill();
		assert_eq!(series, once);
	}

	#[test]
	fn out_of_range_set_is_rejected() {
		let mut series = YearSeries::study_range("x".into());
		assert!(!series.set(1999, 1.0));
		assert!(!series.set(2024, 1.0));
		assert!(series.set(2000, 1.0));
	}

	#[test]
	fn max_gap_limits_interpolation() {
		let mut values: Vec<Option<f64>> = vec![None; 12];
		values[0] = Some(0.0);
		values[3] = Some(3.0);
		values[11] = Some(11.0);
		interpolate_gaps(&mut values[..], Some(2));
		// two-slot gap filled, seven-slot gap not
		assert_eq!(values[1], Some(1.0));
		assert_eq!(values[2], Some(2.0));
		assert_eq!(values[5], None);
		assert_eq!(values[10], None);
	}

	#[test]
	fn hold_edges_on_empty_slice_is_noop() {
		let mut values: Vec<Option<f64>> = vec![None; 4];
		hold_edges(&mut values[..]);
		assert!(values.iter().all(|v| v.is_none()));
	}

	#[test]
	fn day_series_merges_duplicate_dates_by_mean() {
		let records = vec![
			Record{
				location: "Fairfax".into(),
				date: ObservationDate::Day(day(2020, 1, 1)),
				value: 10.0,
			},
			Record{
				location: "Fairfax".into(),
				date: ObservationDate::Day(day(2020, 1, 1)),
				value: 20.0,
			},
			Record{
				location: "Fairfax".into(),
				date: ObservationDate::Day(day(2020, 1, 3)),
				value: 30.0,
			},
		];
		let series = DaySeries::from_records(&records).unwrap();
		assert_eq!(series.len(), 3);
		assert_eq!(series.get(day(2020, 1, 1)), Some(15.0));
		assert_eq!(series.get(day(2020, 1, 2)), None);
		assert_eq!(series.get(day(2020, 1, 3)), Some(30.0));
		assert_eq!(series.location(), "Fairfax");
	}

	#[test]
	fn day_series_fill_covers_whole_range() {
		let records = vec![
			Record{
				location: "Arlington".into(),
				date: ObservationDate::Day(day(2021, 6, 1)),
				value: 40.0,
			},
			Record{
				location: "Arlington".into(),
				date: ObservationDate::Day(day(2021, 6, 11)),
				value: 50.0,
			},
		];
		let mut series = DaySeries::from_records(&records).unwrap();
		series.interpolate(None);
		series.hold_edges();
		series.round(1);
		assert!(series.is_complete());
		assert_eq!(series.len(), 11);
		assert_eq!(series.get(day(2021, 6, 6)), Some(45.0));
	}

	#[test]
	fn day_series_rejects_yearly_only_input() {
		let records = vec![
			Record{
				location: "a".into(),
				date: ObservationDate::Year(2010),
				value: 1.0,
			},
		];
		assert!(DaySeries::from_records(&records).is_none());
	}

	#[test]
	fn clipping_to_a_common_window() {
		let mut series = DaySeries::new("b".into(), day(2020, 1, 1), day(2020, 1, 31));
		for i in 0..31 {
			let d = day(2020, 1, 1) + chrono::Duration::days(i);
			let idx = series.date_index(d).unwrap();
			series.values[idx] = Some(i as f64);
		}
		let clipped = series.clipped(day(2020, 1, 10), day(2020, 1, 20)).unwrap();
		assert_eq!(clipped.len(), 11);
		assert_eq!(clipped.start(), day(2020, 1, 10));
		assert_eq!(clipped.get(day(2020, 1, 10)), Some(9.0));
		assert!(series.clipped(day(2019, 12, 31), day(2020, 1, 5)).is_none());
	}

	#[test]
	fn rounding_to_one_decimal() {
		let mut values = vec![Some(1.04), Some(1.05), None, Some(-0.25)];
		round_values(&mut values[..], 1);
		assert_eq!(values[0], Some(1.0));
		assert_eq!(values[1], Some(1.1));
		assert_eq!(values[2], None);
	}
}
