use std::fs;
use std::io;
use std::path::Path;

use aqinova::{DaySeries, CLEANED_PREFIX, DAILY_PREFIX};


// Interior gaps of any width are interpolated here; the capped variant
// lives in interpolate_aqi. Pass a number as the second argument to cap.
static DEFAULT_MAX_GAP: Option<usize> = None;

fn parse_max_gap(arg: Option<&str>, default: Option<usize>) -> Result<Option<usize>, String> {
	match arg {
		None => Ok(default),
		Some("none") => Ok(None),
		Some(s) => match s.parse::<usize>() {
			Ok(v) => Ok(Some(v)),
			Err(_) => Err(format!("invalid max-gap argument: {}", s)),
		},
	}
}

fn is_cleaned_file(path: &Path) -> bool {
	aqinova::file_name(path).starts_with(CLEANED_PREFIX) && aqinova::is_csv(path)
}

fn fill_file(path: &Path, max_gap: Option<usize>) -> io::Result<()> {
	let r = aqinova::magic_open(path)?;
	let records = aqinova::read_cleaned(r)?;
	let records = aqinova::expand_yearly(records);
	let mut series = match DaySeries::from_records(&records) {
		Some(series) => series,
		None => return Err(io::Error::new(io::ErrorKind::InvalidData, "no usable daily records")),
	};
	series.interpolate(max_gap);
	series.hold_edges();
	series.round(1);

	let out_path = aqinova::staged_path(path, DAILY_PREFIX);
	let w = fs::File::create(&out_path)?;
	aqinova::write_daily(w, &series)?;

	let total = series.len();
	let missing = series.missing();
	println!("Saved filled daily data to {}", aqinova::file_name(&out_path));
	println!("Total days: {}", total);
	println!("Date range: {} to {}", series.start(), series.end());
	println!("Missing values: {}", missing);
	println!(
		"Data completeness: {:.1}%\n",
		(total - missing) as f64 / total as f64 * 100.0,
	);
	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let root = argv.get(1).map(|s| s.as_str()).unwrap_or(".");
	let max_gap = parse_max_gap(argv.get(2).map(|s| s.as_str()), DEFAULT_MAX_GAP)?;
	for entry in aqinova::find_files(root, is_cleaned_file) {
		let path = match entry {
			Ok(path) => path,
			Err(e) => {
				println!("Error walking directory tree: {}", e);
				continue
			},
		};
		println!("Processing {}...", aqinova::file_name(&path));
		if let Err(e) = fill_file(&path, max_gap) {
			println!("Error processing {}: {}\n", path.display(), e);
		}
	}
	Ok(())
}
