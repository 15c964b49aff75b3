use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use aqinova::{DaySeries, CLEANED_PREFIX};


// Only short gaps are bridged for the combined comparison file; longer
// outages stay visible as holes. Pass "none" as the second argument for
// unlimited interpolation.
static DEFAULT_MAX_GAP: Option<usize> = Some(7);

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

fn is_cleaned_aqi_file(path: &Path) -> bool {
	let name = aqinova::file_name(path);
	name.starts_with(CLEANED_PREFIX)
		&& (name.contains("Air quality index") || name.contains("AQI"))
		&& aqinova::is_csv(path)
}

fn load_series(path: &Path) -> io::Result<DaySeries> {
	let r = aqinova::magic_open(path)?;
	let records = aqinova::read_cleaned(r)?;
	let records = aqinova::expand_yearly(records);
	match DaySeries::from_records(&records) {
		Some(series) => Ok(series),
		None => Err(io::Error::new(io::ErrorKind::InvalidData, "no usable daily records")),
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let root = argv.get(1).map(|s| s.as_str()).unwrap_or(".");
	let max_gap = parse_max_gap(argv.get(2).map(|s| s.as_str()), DEFAULT_MAX_GAP)?;

	let mut all_series: Vec<DaySeries> = Vec::new();
	for entry in aqinova::find_files(root, is_cleaned_aqi_file) {
		let path = match entry {
			Ok(path) => path,
			Err(e) => {
				println!("Error walking directory tree: {}", e);
				continue
			},
		};
		println!("Processing {}...", aqinova::file_name(&path));
		match load_series(&path) {
			Ok(series) => {
				println!("Successfully loaded {} data with {} records", series.location(), series.len());
				all_series.push(series);
			},
			Err(e) => println!("Skipping {} due to error: {}", aqinova::file_name(&path), e),
		}
	}
	if all_series.is_empty() {
		println!("No valid data files were processed");
		return Ok(())
	}

	// clip every county to the window all of them cover
	let common_start = all_series.iter().map(|s| s.start()).max().unwrap();
	let common_end = all_series.iter().map(|s| s.end()).min().unwrap();
	if common_start > common_end {
		println!("No common date range across counties");
		return Ok(())
	}
	println!("\nCommon date range: {} to {}", common_start, common_end);

	let mut clipped: Vec<DaySeries> = Vec::new();
	for series in all_series.iter() {
		// the window lies inside every series by construction
		let mut series = series.clipped(common_start, common_end).unwrap();
		series.interpolate(max_gap);
		clipped.push(series);
	}

	let out_path: PathBuf = Path::new(root).join("interpolated_aqi_data.csv");
	let w = fs::File::create(&out_path)?;
	aqinova::write_combined_daily(w, &clipped)?;
	println!("\nInterpolated data saved to {}", out_path.display());

	println!("\nInterpolation statistics:");
	for series in clipped.iter() {
		let total = series.len();
		let missing = series.missing();
		println!("{}:", series.location());
		println!("  Total days: {}", total);
		println!(
			"  Missing values after interpolation: {} ({:.1}%)",
			missing,
			missing as f64 / total as f64 * 100.0,
		);
	}
	Ok(())
}
