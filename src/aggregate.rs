use std::collections::BTreeMap;

use chrono::Datelike;

use smartstring::alias::{String as SmartString};

use crate::record::{DailyRow, Record, YearlyRow};
use crate::FIRST_YEAR;


fn round1(v: f64) -> f64 {
	(v * 10.0).round() / 10.0
}

/// Regroup a daily table into yearly means per (Location, year), years
/// before FIRST_YEAR dropped, rounded to one decimal. Output is sorted by
/// (Location, year); the year is serialized as a string downstream.
pub fn aggregate_to_yearly(rows: &[DailyRow]) -> Vec<YearlyRow> {
	let mut acc: BTreeMap<(SmartString, i32), (f64, u64)> = BTreeMap::new();
	for row in rows {
		let year = row.date.year();
		if year < FIRST_YEAR {
			continue
		}
		let slot = acc.entry((row.location.clone(), year)).or_insert((0.0, 0));
		slot.0 += row.value;
		slot.1 += 1;
	}
	acc.into_iter()
		.map(|((location, year), (sum, n))| YearlyRow{
			location,
			year: year.to_string().into(),
			value: round1(sum / n as f64),
		})
		.collect()
}

/// Mean observed value per year, over records of any granularity.
pub fn yearly_means(records: &[Record]) -> BTreeMap<i32, f64> {
	let mut acc: BTreeMap<i32, (f64, u64)> = BTreeMap::new();
	for rec in records {
		let slot = acc.entry(rec.date.year()).or_insert((0.0, 0));
		slot.0 += rec.value;
		slot.1 += 1;
	}
	acc.into_iter().map(|(year, (sum, n))| (year, sum / n as f64)).collect()
}
