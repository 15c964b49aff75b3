use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use csv;

use aqinova::{YearlyRow, YEARLY_PREFIX};


fn is_daily_cleaned_file(path: &Path) -> bool {
	let name = aqinova::file_name(path);
	name.starts_with("daily_cleaned_") && aqinova::is_csv(path)
}

fn aggregate_file(path: &Path) -> io::Result<Vec<YearlyRow>> {
	let r = aqinova::magic_open(path)?;
	let rows = aqinova::read_daily(r)?;
	let yearly = aqinova::aggregate_to_yearly(&rows);

	let out_path = aqinova::staged_path(path, YEARLY_PREFIX);
	let w = fs::File::create(&out_path)?;
	let mut w = csv::Writer::from_writer(w);
	for row in yearly.iter() {
		w.serialize(row)?;
	}
	w.flush()?;
	println!("Saved yearly averages to {}", out_path.display());
	Ok(yearly)
}

fn print_summary(combined: &[YearlyRow]) {
	println!("\nSummary of yearly data:");
	let mut i = 0;
	while i < combined.len() {
		let location = &combined[i].location;
		let mut j = i;
		let mut sum = 0.0;
		while j < combined.len() && &combined[j].location == location {
			sum += combined[j].value;
			j += 1;
		}
		let n = j - i;
		println!("\n{}:", location);
		println!("  Years covered: {} - {}", combined[i].year, combined[j - 1].year);
		println!("  Average AQI: {:.1}", sum / n as f64);
		println!("  Number of years: {}", n);
		i = j;
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let root = argv.get(1).map(|s| s.as_str()).unwrap_or(".");

	let mut combined: Vec<YearlyRow> = Vec::new();
	for entry in aqinova::find_files(root, is_daily_cleaned_file) {
		let path = match entry {
			Ok(path) => path,
			Err(e) => {
				println!("Error walking directory tree: {}", e);
				continue
			},
		};
		println!("Processing {}...", aqinova::file_name(&path));
		match aggregate_file(&path) {
			Ok(rows) => combined.extend(rows),
			Err(e) => println!("Error processing {}: {}", path.display(), e),
		}
	}
	if combined.is_empty() {
		return Ok(())
	}

	combined.sort_by(|a, b| (&a.location, &a.year).cmp(&(&b.location, &b.year)));
	let out_path: PathBuf = Path::new(root).join("combined_yearly_aqi.csv");
	let w = fs::File::create(&out_path)?;
	let mut w = csv::Writer::from_writer(w);
	for row in combined.iter() {
		w.serialize(row)?;
	}
	w.flush()?;
	println!("\nSaved combined yearly data to {}", out_path.display());

	print_summary(&combined);
	Ok(())
}
