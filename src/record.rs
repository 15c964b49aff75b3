use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use chrono::naive::NaiveDate;
use chrono::Datelike;

use smartstring::alias::{String as SmartString};


/// A single observation date, either a whole calendar year (yearly series)
/// or a specific day (daily series).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObservationDate {
	Year(i32),
	Day(NaiveDate),
}

impl ObservationDate {
	pub fn year(&self) -> i32 {
		match self {
			Self::Year(y) => *y,
			Self::Day(d) => d.year(),
		}
	}

	pub fn as_day(&self) -> Option<NaiveDate> {
		match self {
			Self::Year(_) => None,
			Self::Day(d) => Some(*d),
		}
	}

	pub fn is_yearly(&self) -> bool {
		match self {
			Self::Year(_) => true,
			Self::Day(_) => false,
		}
	}
}


#[derive(Debug, Clone)]
pub enum ParseDateError {
	Empty,
	InvalidYear(ParseIntError),
	UnrecognizedFormat,
}

impl fmt::Display for ParseDateError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Empty => f.write_str("empty date field"),
			Self::InvalidYear(e) => fmt::Display::fmt(e, f),
			Self::UnrecognizedFormat => f.write_str("date matches none of the known formats"),
		}
	}
}

impl std::error::Error for ParseDateError {}

impl From<ParseIntError> for ParseDateError {
	fn from(other: ParseIntError) -> Self {
		Self::InvalidYear(other)
	}
}


/// True for a bare ≤4-digit string, the shape yearly exports use for dates.
pub fn is_year_string(s: &str) -> bool {
	let s = s.trim();
	!s.is_empty() && s.len() <= 4 && s.bytes().all(|b| b.is_ascii_digit())
}


static DAY_FORMATS: &'static [&'static str] = &[
	"%Y-%m-%d",
	"%m/%d/%Y",
	"%Y/%m/%d",
];

impl FromStr for ObservationDate {
	type Err = ParseDateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		if s.is_empty() {
			return Err(ParseDateError::Empty)
		}
		if is_year_string(s) {
			return Ok(Self::Year(s.parse::<i32>()?))
		}
		// some exports carry a full pseudo-ISO timestamp; keep the date part
		let day_part = match s.get(..10) {
			Some(head) if s.len() == 19 => head.replace("/", "-"),
			_ => s.to_string(),
		};
		for fmt in DAY_FORMATS {
			if let Ok(d) = NaiveDate::parse_from_str(&day_part, fmt) {
				return Ok(Self::Day(d))
			}
		}
		// year-month exports (temperature data) pin to the first of the month
		if let Ok(d) = NaiveDate::parse_from_str(&format!("{}-01", day_part), "%Y-%m-%d") {
			return Ok(Self::Day(d))
		}
		Err(ParseDateError::UnrecognizedFormat)
	}
}

impl fmt::Display for ObservationDate {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Year(y) => write!(f, "{}", y),
			Self::Day(d) => fmt::Display::fmt(d, f),
		}
	}
}

impl<'de> Deserialize<'de> for ObservationDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where D: Deserializer<'de>
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for ObservationDate {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where S: Serializer
	{
		serializer.collect_str(self)
	}
}


/// Which measure a file carries, guessed from its file name. Drives the
/// preferred value-column names during sniffing and the yearly output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
	Aqi,
	Pm25,
	Income,
	Employment,
	Population,
	Temperature,
	Other,
}

impl Measure {
	pub fn from_file_name(name: &str) -> Self {
		if name.contains("AQI") || name.contains("Air quality") {
			Self::Aqi
		} else if name.contains("PM2.5") {
			Self::Pm25
		} else if name.contains("income") {
			Self::Income
		} else if name.contains("employed") || name.contains("employment") {
			Self::Employment
		} else if name.contains("Population") {
			Self::Population
		} else if name.contains("temperature") || name.contains("Temp") {
			Self::Temperature
		} else {
			Self::Other
		}
	}

	pub fn column_name(&self) -> &'static str {
		match self {
			Self::Aqi => "AQI",
			Self::Pm25 => "PM2.5",
			Self::Income => "Income",
			Self::Employment => "Employment",
			Self::Population => "Population",
			Self::Temperature => "Temperature",
			Self::Other => "Value",
		}
	}

	/// Column names to try for an exact header match, in order.
	pub fn preferred_columns(&self) -> &'static [&'static str] {
		match self {
			Self::Aqi => &["AQI", "Value"],
			_ => &["Value"],
		}
	}

	pub fn yearly_file_name(&self) -> String {
		format!("{}_yearly_2000_2023.csv", self.column_name().to_lowercase())
	}
}


/// The common shape every input schema is normalized to. Also the row shape
/// of `cleaned_*` files, hence the serde column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
	#[serde(rename = "Location")]
	pub location: SmartString,
	#[serde(rename = "Date")]
	pub date: ObservationDate,
	#[serde(rename = "AQI")]
	pub value: f64,
}


/// Row shape of `daily_*` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
	#[serde(rename = "Date")]
	pub date: NaiveDate,
	#[serde(rename = "Location")]
	pub location: SmartString,
	#[serde(rename = "AQI")]
	pub value: f64,
}


/// Row shape of `yearly_*` files. The year is kept as a string under a
/// `Date` header for format compatibility with the other yearly files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRow {
	#[serde(rename = "Location")]
	pub location: SmartString,
	#[serde(rename = "Date")]
	pub year: SmartString,
	#[serde(rename = "AQI")]
	pub value: f64,
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn parse_year_date() {
		match "2005".parse::<ObservationDate>().unwrap() {
			ObservationDate::Year(y) => assert_eq!(y, 2005),
			other => panic!("expected year, got {:?}", other),
		}
	}

	#[test]
	fn parse_iso_day() {
		let d = "2015-02-03".parse::<ObservationDate>().unwrap();
		assert_eq!(d.as_day(), NaiveDate::from_ymd_opt(2015, 2, 3));
	}

	#[test]
	fn parse_us_day() {
		let d = "1/31/2000".parse::<ObservationDate>().unwrap();
		assert_eq!(d.as_day(), NaiveDate::from_ymd_opt(2000, 1, 31));
	}

	#[test]
	fn parse_slashed_iso_day() {
		let d = "2000/01/31".parse::<ObservationDate>().unwrap();
		assert_eq!(d.as_day(), NaiveDate::from_ymd_opt(2000, 1, 31));
	}

	#[test]
	fn parse_year_month() {
		let d = "2006-03".parse::<ObservationDate>().unwrap();
		assert_eq!(d.as_day(), NaiveDate::from_ymd_opt(2006, 3, 1));
	}

	#[test]
	fn parse_pseudo_iso_timestamp() {
		let d = "2020/03/01 00:00:00".parse::<ObservationDate>().unwrap();
		assert_eq!(d.as_day(), NaiveDate::from_ymd_opt(2020, 3, 1));
	}

	#[test]
	fn parse_rejects_garbage() {
		assert!("".parse::<ObservationDate>().is_err());
		assert!("notadate".parse::<ObservationDate>().is_err());
	}

	#[test]
	fn parse_rejects_multibyte_pseudo_timestamp() {
		// 19 bytes with 'é' straddling byte offset 10; must error, not slice
		assert!("123456789é12345678".parse::<ObservationDate>().is_err());
		assert!("2020/03/0é 00:00:0".parse::<ObservationDate>().is_err());
	}

	#[test]
	fn year_display_roundtrip() {
		let d = ObservationDate::Year(2023);
		assert_eq!(d.to_string(), "2023");
		assert_eq!(d.to_string().parse::<ObservationDate>().unwrap(), d);
	}

	#[test]
	fn measure_from_file_name() {
		assert_eq!(Measure::from_file_name("Air quality index in Loudoun County.csv"), Measure::Aqi);
		assert_eq!(Measure::from_file_name("PM2.5 levels.csv"), Measure::Pm25);
		assert_eq!(Measure::from_file_name("median household income.csv"), Measure::Income);
		assert_eq!(Measure::from_file_name("Count of employed persons.csv"), Measure::Employment);
		assert_eq!(Measure::from_file_name("Population of Howard County.csv"), Measure::Population);
		assert_eq!(Measure::from_file_name("Loudoun Yearly Temp Change 2000-2024.csv"), Measure::Temperature);
		assert_eq!(Measure::from_file_name("something else.csv"), Measure::Other);
	}

	#[test]
	fn measure_yearly_file_name() {
		assert_eq!(Measure::Aqi.yearly_file_name(), "aqi_yearly_2000_2023.csv");
		assert_eq!(Measure::Pm25.yearly_file_name(), "pm2.5_yearly_2000_2023.csv");
	}
}
