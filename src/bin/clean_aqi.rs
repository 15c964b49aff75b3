use std::fs;
use std::io;
use std::path::Path;

use csv;

use aqinova::{CountMeter, ProgressSink, Record, CLEANED_PREFIX};


fn is_raw_aqi_file(path: &Path) -> bool {
	let name = aqinova::file_name(path);
	(name.contains("Air quality index") || name.contains("AQI"))
		&& aqinova::is_csv(path)
		&& !aqinova::has_stage_prefix(path)
}

fn clean_file<S: ProgressSink + ?Sized>(s: &mut S, path: &Path) -> io::Result<usize> {
	let r = aqinova::magic_open(path)?;
	let mut r = csv::ReaderBuilder::new()
		.flexible(true)
		.from_reader(r);
	let yearly = r.headers()?.iter().any(|h| h.trim() == "Year");

	let mut records: Vec<Record> = Vec::new();
	let mut pm = CountMeter::new(s);
	let mut n = 0;
	for (i, row) in r.records().enumerate() {
		let row = match row {
			Ok(row) => row,
			// row-level corruption is dropped, never fatal
			Err(_) => continue,
		};
		let rec = if yearly {
			aqinova::normalize_yearly_row(&row)
		} else {
			aqinova::normalize_row(&row)
		};
		if let Some(rec) = rec {
			records.push(rec);
		}
		if i % 100 == 99 {
			pm.update(i + 1);
		}
		n = i + 1;
	}
	pm.finish(n);

	let out_path = aqinova::staged_path(path, CLEANED_PREFIX);
	let w = fs::File::create(&out_path)?;
	aqinova::write_cleaned(w, &records)?;
	println!("Cleaned data saved to {} with {} records", out_path.display(), records.len());
	Ok(records.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let root = argv.get(1).map(|s| s.as_str()).unwrap_or(".");
	for entry in aqinova::find_files(root, is_raw_aqi_file) {
		let path = match entry {
			Ok(path) => path,
			Err(e) => {
				println!("Error walking directory tree: {}", e);
				continue
			},
		};
		println!("Processing {}...", aqinova::file_name(&path));
		if let Err(e) = clean_file(&mut *aqinova::default_output(), &path) {
			println!("Error processing {}: {}", path.display(), e);
		}
	}
	Ok(())
}
