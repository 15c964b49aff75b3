use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv;

use smartstring::alias::{String as SmartString};

use aqinova::{Measure, Record, YearSeries};


fn is_candidate_file(path: &Path) -> bool {
	let name = aqinova::file_name(path);
	aqinova::is_csv(path)
		&& !aqinova::has_stage_prefix(path)
		&& !name.ends_with("_yearly_2000_2023.csv")
		&& name != "interpolated_aqi_data.csv"
		&& name != "combined_yearly_aqi.csv"
}

/// County name from the directory layout: each county keeps its files in a
/// "<County>, <ST> Data" directory.
fn county_name(path: &Path) -> SmartString {
	let dir = path
		.parent()
		.and_then(|p| p.file_name())
		.and_then(|n| n.to_str())
		.unwrap_or("");
	dir.trim_end_matches(" Data").into()
}

fn process_file(path: &Path) -> io::Result<PathBuf> {
	let name = aqinova::file_name(path);
	let measure = Measure::from_file_name(name);
	let county = county_name(path);

	let r = aqinova::magic_open(path)?;
	let mut r = csv::ReaderBuilder::new()
		.flexible(true)
		.from_reader(r);
	let header = r.headers()?.clone();
	let mut rows = Vec::new();
	for row in r.records() {
		match row {
			Ok(row) => rows.push(row),
			Err(_) => continue,
		}
	}
	let schema = aqinova::sniff(&header, rows.first(), measure)?;

	let mut records: Vec<Record> = Vec::new();
	for row in rows.iter() {
		if let Some(rec) = aqinova::extract_with_schema(row, &schema, &county) {
			records.push(rec);
		}
	}

	let mut series = YearSeries::study_range(county);
	for (year, mean) in aqinova::yearly_means(&records) {
		// years outside the study window fall off here
		series.set(year, mean);
	}
	series.fill();

	let out_path = path.with_file_name(measure.yearly_file_name());
	let w = fs::File::create(&out_path)?;
	aqinova::write_yearly_series(w, &series, measure)?;
	println!("Saved processed data to {}", out_path.display());
	Ok(out_path)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let root = argv.get(1).map(|s| s.as_str()).unwrap_or(".");
	let mut processed = 0usize;
	for entry in aqinova::find_files(root, is_candidate_file) {
		let path = match entry {
			Ok(path) => path,
			Err(e) => {
				println!("Error walking directory tree: {}", e);
				continue
			},
		};
		println!("Processing {}...", path.display());
		match process_file(&path) {
			Ok(_) => {
				processed += 1;
			},
			Err(e) => println!("Error processing {}: {}", path.display(), e),
		}
	}
	println!("Processed {} files", processed);
	Ok(())
}
