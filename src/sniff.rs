use std::fmt;
use std::io;

use log::trace;

use csv::StringRecord;

use crate::record::{is_year_string, Measure};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
	Yearly,
	Daily,
}

/// The result of sniffing: where the date and value live and whether the
/// table is yearly or daily.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
	pub kind: SeriesKind,
	pub date_column: usize,
	pub value_column: usize,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffError {
	NoDateColumn,
	NoValueColumn,
}

impl fmt::Display for SniffError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::NoDateColumn => f.write_str("no rule matched a date column"),
			Self::NoValueColumn => f.write_str("no numeric value column found"),
		}
	}
}

impl std::error::Error for SniffError {}

impl From<SniffError> for io::Error {
	fn from(other: SniffError) -> Self {
		io::Error::new(io::ErrorKind::InvalidData, other)
	}
}


fn find_column(header: &StringRecord, name: &str) -> Option<usize> {
	header.iter().position(|h| h.trim() == name)
}

fn sample_field<'x>(sample: Option<&'x StringRecord>, col: usize) -> Option<&'x str> {
	sample.and_then(|row| row.get(col))
}

fn kind_from_sample(sample: Option<&StringRecord>, col: usize) -> SeriesKind {
	match sample_field(sample, col) {
		Some(s) if is_year_string(s) => SeriesKind::Yearly,
		_ => SeriesKind::Daily,
	}
}

fn looks_like_date(s: &str) -> bool {
	let s = s.trim();
	s.contains('-') && s.len() >= 8
}


type DateRule = fn(&StringRecord, Option<&StringRecord>) -> Option<(usize, SeriesKind)>;

fn variable_observation_rule(header: &StringRecord, sample: Option<&StringRecord>) -> Option<(usize, SeriesKind)> {
	let date = find_column(header, "Variable observation date")?;
	// only trust the pair; the value column is found by exact match below
	find_column(header, "Variable observation value")?;
	Some((date, kind_from_sample(sample, date)))
}

fn year_column_rule(header: &StringRecord, _sample: Option<&StringRecord>) -> Option<(usize, SeriesKind)> {
	Some((find_column(header, "Year")?, SeriesKind::Yearly))
}

fn date_column_rule(header: &StringRecord, sample: Option<&StringRecord>) -> Option<(usize, SeriesKind)> {
	let date = find_column(header, "Date")?;
	Some((date, kind_from_sample(sample, date)))
}

fn date_like_sample_rule(header: &StringRecord, sample: Option<&StringRecord>) -> Option<(usize, SeriesKind)> {
	for col in 0..header.len() {
		match sample_field(sample, col) {
			Some(s) if looks_like_date(s) => return Some((col, SeriesKind::Daily)),
			_ => (),
		}
	}
	None
}

// Evaluated in priority order; the first hit wins. An explicit list instead
// of ad-hoc guessing so that "no rule matched" is a visible outcome.
static DATE_RULES: &'static [(&'static str, DateRule)] = &[
	("variable-observation-pair", variable_observation_rule),
	("year-column", year_column_rule),
	("date-column", date_column_rule),
	("date-like-sample", date_like_sample_rule),
];


fn exact_value_column(header: &StringRecord, measure: Measure, date_column: usize) -> Option<usize> {
	// the datacommons export pairs its date column with this exact name
	if let Some(i) = find_column(header, "Variable observation value") {
		if i != date_column {
			return Some(i)
		}
	}
	for name in measure.preferred_columns() {
		match find_column(header, name) {
			Some(i) if i != date_column => return Some(i),
			_ => (),
		}
	}
	None
}

fn numeric_fallback_column(header: &StringRecord, sample: Option<&StringRecord>, date_column: usize) -> Option<usize> {
	for col in 0..header.len() {
		if col == date_column {
			continue
		}
		match sample_field(sample, col) {
			Some(s) if s.trim().parse::<f64>().is_ok() => return Some(col),
			_ => (),
		}
	}
	None
}


/// Guess the table schema from the header and one sample row. Returns an
/// error instead of guessing when no rule applies.
pub fn sniff(header: &StringRecord, sample: Option<&StringRecord>, measure: Measure) -> Result<TableSchema, SniffError> {
	let mut hit = None;
	for (name, rule) in DATE_RULES {
		if let Some((date_column, kind)) = rule(header, sample) {
			trace!("date rule {} matched column {}", name, date_column);
			hit = Some((date_column, kind));
			break;
		}
	}
	let (date_column, kind) = hit.ok_or(SniffError::NoDateColumn)?;
	let value_column = exact_value_column(header, measure, date_column)
		.or_else(|| numeric_fallback_column(header, sample, date_column))
		.ok_or(SniffError::NoValueColumn)?;
	Ok(TableSchema{
		kind,
		date_column,
		value_column,
	})
}


#[cfg(test)]
mod test {
	use super::*;

	fn rec(fields: &[&str]) -> StringRecord {
		StringRecord::from(fields.to_vec())
	}

	#[test]
	fn variable_observation_pair_wins() {
		let header = rec(&["Variable observation date", "Variable observation value", "Date"]);
		let sample = rec(&["2006-03", "1.2", "2006-03-15"]);
		let schema = sniff(&header, Some(&sample), Measure::Temperature).unwrap();
		assert_eq!(schema.date_column, 0);
		assert_eq!(schema.value_column, 1);
		assert_eq!(schema.kind, SeriesKind::Daily);
	}

	#[test]
	fn year_column_beats_date_column() {
		let header = rec(&["Location", "Year", "Date", "Value"]);
		let sample = rec(&["x", "2005", "2005-01-01", "3.5"]);
		let schema = sniff(&header, Some(&sample), Measure::Income).unwrap();
		assert_eq!(schema.date_column, 1);
		assert_eq!(schema.kind, SeriesKind::Yearly);
		assert_eq!(schema.value_column, 3);
	}

	#[test]
	fn date_column_kind_follows_sample() {
		let header = rec(&["Location", "Date", "AQI"]);
		let yearly = rec(&["x", "2005", "40"]);
		let daily = rec(&["x", "2005-06-01", "40"]);
		assert_eq!(sniff(&header, Some(&yearly), Measure::Aqi).unwrap().kind, SeriesKind::Yearly);
		assert_eq!(sniff(&header, Some(&daily), Measure::Aqi).unwrap().kind, SeriesKind::Daily);
	}

	#[test]
	fn content_heuristic_finds_unnamed_date() {
		let header = rec(&["a", "b", "c"]);
		let sample = rec(&["foo", "2015-02-03", "7.5"]);
		let schema = sniff(&header, Some(&sample), Measure::Other).unwrap();
		assert_eq!(schema.date_column, 1);
		assert_eq!(schema.kind, SeriesKind::Daily);
		assert_eq!(schema.value_column, 2);
	}

	#[test]
	fn exact_measure_match_preferred_over_first_numeric() {
		let header = rec(&["Date", "Ozone", "AQI"]);
		let sample = rec(&["2020-01-01", "12.0", "45.0"]);
		let schema = sniff(&header, Some(&sample), Measure::Aqi).unwrap();
		assert_eq!(schema.value_column, 2);
	}

	#[test]
	fn numeric_fallback_skips_date_column() {
		let header = rec(&["Date", "Station", "Reading"]);
		let sample = rec(&["2020-01-01", "ABC", "3.25"]);
		let schema = sniff(&header, Some(&sample), Measure::Other).unwrap();
		assert_eq!(schema.value_column, 2);
	}

	#[test]
	fn no_date_rule_is_an_error() {
		let header = rec(&["a", "b"]);
		let sample = rec(&["foo", "1.0"]);
		assert_eq!(sniff(&header, Some(&sample), Measure::Other), Err(SniffError::NoDateColumn));
	}

	#[test]
	fn no_value_column_is_an_error() {
		let header = rec(&["Date", "Comment"]);
		let sample = rec(&["2020-01-01", "cloudy"]);
		assert_eq!(sniff(&header, Some(&sample), Measure::Other), Err(SniffError::NoValueColumn));
	}
}
