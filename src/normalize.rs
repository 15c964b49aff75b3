use std::io;

use csv::StringRecord;

use chrono::Datelike;

use smartstring::alias::{String as SmartString};

use crate::record::{DailyRow, Measure, ObservationDate, Record};
use crate::series::{DaySeries, YearSeries};
use crate::sniff::{SeriesKind, TableSchema};
use crate::FIRST_YEAR;


// Legacy wide export: Location/Date/Value sit at fixed offsets in rows of
// eleven or more columns.
static WIDE_MIN_COLUMNS: usize = 11;
static WIDE_LOCATION_COLUMN: usize = 2;
static WIDE_DATE_COLUMN: usize = 4;
static WIDE_VALUE_COLUMN: usize = 10;


fn record_from(location: &str, date: &str, value: &str) -> Option<Record> {
	let date = date.trim().parse::<ObservationDate>().ok()?;
	let value = value.trim().parse::<f64>().ok()?;
	Some(Record{
		location: location.trim().into(),
		date,
		value,
	})
}

/// Normalize one raw daily-table row. Handles the 3-column simple shape and
/// the ≥11-column wide shape; anything else, and any row whose value does
/// not coerce to a number, yields None (dropped silently by callers).
pub fn normalize_row(row: &StringRecord) -> Option<Record> {
	if row.len() == 3 {
		record_from(row.get(0)?, row.get(1)?, row.get(2)?)
	} else if row.len() >= WIDE_MIN_COLUMNS {
		record_from(
			row.get(WIDE_LOCATION_COLUMN)?,
			row.get(WIDE_DATE_COLUMN)?,
			row.get(WIDE_VALUE_COLUMN)?,
		)
	} else {
		None
	}
}

/// Normalize one yearly-table row (Location, Year, Value).
pub fn normalize_yearly_row(row: &StringRecord) -> Option<Record> {
	let rec = record_from(row.get(0)?, row.get(1)?, row.get(2)?)?;
	if !rec.date.is_yearly() {
		return None
	}
	Some(rec)
}

/// Extract a Record through a sniffed schema. The location comes from the
/// caller (county directory name), not from the table.
pub fn extract_with_schema(row: &StringRecord, schema: &TableSchema, location: &str) -> Option<Record> {
	let date_s = row.get(schema.date_column)?;
	let value = row.get(schema.value_column)?.trim().parse::<f64>().ok()?;
	let date = match schema.kind {
		SeriesKind::Yearly => ObservationDate::Year(parse_year(date_s)?),
		SeriesKind::Daily => match date_s.trim().parse::<ObservationDate>() {
			Ok(d) => d,
			// last resort: a four-digit year buried in the string
			Err(_) => ObservationDate::Year(extract_year(date_s)?),
		},
	};
	Some(Record{
		location: location.into(),
		date,
		value,
	})
}

fn parse_year(s: &str) -> Option<i32> {
	let s = s.trim();
	if let Ok(y) = s.parse::<i32>() {
		return Some(y)
	}
	// yearly columns occasionally come float-typed ("2005.0")
	if let Ok(y) = s.parse::<f64>() {
		return Some(y as i32)
	}
	extract_year(s)
}

/// First run of exactly four digits in `s`, if any.
pub fn extract_year(s: &str) -> Option<i32> {
	let bytes = s.as_bytes();
	let mut run = 0;
	for (i, b) in bytes.iter().enumerate() {
		if b.is_ascii_digit() {
			run += 1;
		} else {
			if run == 4 {
				return s[i - 4..i].parse::<i32>().ok()
			}
			run = 0;
		}
	}
	if run == 4 {
		return s[bytes.len() - 4..].parse::<i32>().ok()
	}
	None
}


/// Expand cleaned records for daily filling. Decided by the first record,
/// like the table-shape check on input: a yearly file expands every year to
/// one constant value per day; a daily file keeps its day records. Years
/// before FIRST_YEAR are skipped either way.
pub fn expand_yearly(records: Vec<Record>) -> Vec<Record> {
	let yearly = match records.first() {
		Some(rec) => rec.date.is_yearly(),
		None => return records,
	};
	if !yearly {
		return records
			.into_iter()
			.filter(|rec| !rec.date.is_yearly() && rec.date.year() >= FIRST_YEAR)
			.collect()
	}
	let mut out = Vec::new();
	for rec in records {
		let year = match rec.date {
			ObservationDate::Year(y) => y,
			ObservationDate::Day(_) => continue,
		};
		if year < FIRST_YEAR {
			continue
		}
		let start = match chrono::NaiveDate::from_ymd_opt(year, 1, 1) {
			Some(d) => d,
			None => continue,
		};
		for day in start.iter_days().take_while(|d| d.year() == year) {
			out.push(Record{
				location: rec.location.clone(),
				date: ObservationDate::Day(day),
				value: rec.value,
			});
		}
	}
	out
}


/// Read a `cleaned_*` file back. Rows that fail to deserialize are dropped,
/// matching the row-level error policy everywhere else.
pub fn read_cleaned<R: io::Read>(r: R) -> io::Result<Vec<Record>> {
	let mut r = csv::Reader::from_reader(r);
	let mut out = Vec::new();
	for row in r.deserialize() {
		match row {
			Ok(rec) => out.push(rec),
			Err(_) => continue,
		}
	}
	Ok(out)
}

pub fn write_cleaned<W: io::Write>(w: W, records: &[Record]) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	for rec in records {
		w.serialize(rec)?;
	}
	w.flush()?;
	Ok(())
}

/// Read a `daily_*` file. Same row-level drop policy as [`read_cleaned`].
pub fn read_daily<R: io::Read>(r: R) -> io::Result<Vec<DailyRow>> {
	let mut r = csv::Reader::from_reader(r);
	let mut out = Vec::new();
	for row in r.deserialize() {
		match row {
			Ok(rec) => out.push(rec),
			Err(_) => continue,
		}
	}
	Ok(out)
}

/// Serialize a filled daily series as `[Date, Location, AQI]`. Slots still
/// empty (gap-limited fills) are skipped.
pub fn write_daily<W: io::Write>(w: W, series: &DaySeries) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	for (date, value) in series.iter() {
		let value = match value {
			Some(v) => v,
			None => continue,
		};
		w.serialize(DailyRow{
			date,
			location: series.location().into(),
			value,
		})?;
	}
	w.flush()?;
	Ok(())
}

/// Serialize a yearly series as `[Location, Year, <Measure>]`.
pub fn write_yearly_series<W: io::Write>(w: W, series: &YearSeries, measure: Measure) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	w.write_record(&["Location", "Year", measure.column_name()])?;
	for (year, value) in series.iter() {
		let value = match value {
			Some(v) => format!("{:?}", v),
			None => String::new(),
		};
		let year = year.to_string();
		w.write_record(&[series.location(), year.as_str(), value.as_str()])?;
	}
	w.flush()?;
	Ok(())
}


/// Serialize clipped per-county series as one wide table, one column per
/// location, empty cells where the gap limit left values missing.
pub fn write_combined_daily<W: io::Write>(w: W, series: &[DaySeries]) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	let mut header: Vec<SmartString> = vec!["Date".into()];
	for s in series {
		header.push(s.location().into());
	}
	w.write_record(header.iter().map(|h| &h[..]))?;
	let len = series.iter().map(|s| s.len()).min().unwrap_or(0);
	for i in 0..len {
		let mut row: Vec<String> = Vec::with_capacity(series.len() + 1);
		// all series share a start after clipping; take the date off the first
		let date = match series[0].index_date(i) {
			Some(d) => d,
			None => break,
		};
		row.push(date.to_string());
		for s in series {
			row.push(match s.index_date(i).and_then(|d| s.get(d)) {
				Some(v) => format!("{:?}", v),
				None => String::new(),
			});
		}
		w.write_record(row.iter().map(|f| f.as_str()))?;
	}
	w.flush()?;
	Ok(())
}


#[cfg(test)]
mod test {
	use super::*;

	use crate::sniff;

	fn rec(fields: &[&str]) -> StringRecord {
		StringRecord::from(fields.to_vec())
	}

	#[test]
	fn simple_three_column_row() {
		let r = normalize_row(&rec(&["Fairfax", "2020-01-01", "42.5"])).unwrap();
		assert_eq!(&r.location[..], "Fairfax");
		assert_eq!(r.date.year(), 2020);
		assert_eq!(r.value, 42.5);
	}

	#[test]
	fn wide_row_uses_fixed_offsets() {
		let r = normalize_row(&rec(&[
			"a", "b", "Loudoun County", "d", "2019-07-04",
			"f", "g", "h", "i", "j", "33.0", "extra",
		])).unwrap();
		assert_eq!(&r.location[..], "Loudoun County");
		assert_eq!(r.date.as_day().map(|d| d.to_string()), Some("2019-07-04".to_string()));
		assert_eq!(r.value, 33.0);
	}

	#[test]
	fn malformed_value_drops_row_only() {
		assert!(normalize_row(&rec(&["x", "2020-01-01", "not-a-number"])).is_none());
		assert!(normalize_row(&rec(&["x", "garbage", "1.0"])).is_none());
		// multibyte garbage in a timestamp-length date field
		assert!(normalize_row(&rec(&["x", "2020/03/0é 00:00:0", "1.0"])).is_none());
		// too narrow, too wide-but-short
		assert!(normalize_row(&rec(&["x", "1.0"])).is_none());
		assert!(normalize_row(&rec(&["a", "b", "c", "d", "e"])).is_none());
	}

	#[test]
	fn yearly_row_requires_a_year() {
		let r = normalize_yearly_row(&rec(&["Howard", " 2007 ", "12"])).unwrap();
		assert_eq!(r.date, ObservationDate::Year(2007));
		assert!(normalize_yearly_row(&rec(&["Howard", "2007-01-01", "12"])).is_none());
	}

	#[test]
	fn year_extraction_from_strings() {
		assert_eq!(extract_year("FY 2013 estimate"), Some(2013));
		assert_eq!(extract_year("2013"), Some(2013));
		assert_eq!(extract_year("13"), None);
		assert_eq!(extract_year("20131"), None);
	}

	#[test]
	fn schema_extraction_with_yearly_float_years() {
		let header = rec(&["Year", "Value"]);
		let sample = rec(&["2005.0", "9.5"]);
		let schema = sniff::sniff(&header, Some(&sample), Measure::Other).unwrap();
		let r = extract_with_schema(&sample, &schema, "Howard County, MD").unwrap();
		assert_eq!(r.date, ObservationDate::Year(2005));
		assert_eq!(r.value, 9.5);
	}

	#[test]
	fn expand_yearly_repeats_value_over_days() {
		let records = vec![
			Record{
				location: "x".into(),
				date: ObservationDate::Year(2020),
				value: 5.0,
			},
			Record{
				location: "x".into(),
				date: ObservationDate::Year(1999),
				value: 1.0,
			},
		];
		let expanded = expand_yearly(records);
		// 2020 is a leap year; 1999 is before the study window
		assert_eq!(expanded.len(), 366);
		assert!(expanded.iter().all(|r| r.value == 5.0));
		assert!(expanded.iter().all(|r| r.date.year() == 2020));
	}

	#[test]
	fn expand_daily_filters_early_years() {
		let records = vec![
			Record{
				location: "x".into(),
				date: ObservationDate::Day(chrono::NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
				value: 1.0,
			},
			Record{
				location: "x".into(),
				date: ObservationDate::Day(chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
				value: 2.0,
			},
		];
		let expanded = expand_yearly(records);
		assert_eq!(expanded.len(), 1);
		assert_eq!(expanded[0].value, 2.0);
	}

	#[test]
	fn cleaned_roundtrip_drops_bad_rows() {
		let input = "\
Location,Date,AQI
Fairfax,2020-01-01,40.0
Fairfax,2020-01-02,bogus
Fairfax,2020-01-03,44.5
";
		let records = read_cleaned(input.as_bytes()).unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].value, 40.0);
		assert_eq!(records[1].value, 44.5);
		let mut buf = Vec::new();
		write_cleaned(&mut buf, &records).unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert!(text.starts_with("Location,Date,AQI\n"));
		assert!(text.contains("Fairfax,2020-01-03,44.5\n"));
	}
}
