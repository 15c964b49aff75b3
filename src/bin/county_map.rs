use std::fs;

use aqinova::map;


fn main() -> Result<(), Box<dyn std::error::Error>> {
	let argv: Vec<String> = std::env::args().collect();
	let out_path = argv.get(1).map(|s| s.as_str()).unwrap_or("county_map.geojson");

	let counties = map::study_counties();
	let doc = map::to_geojson(counties);
	let w = fs::File::create(out_path)?;
	serde_json::to_writer_pretty(w, &doc)?;

	println!("Map data has been saved as '{}'", out_path);
	println!("Feed this file to any GeoJSON renderer to view the studied counties:");
	for county in counties {
		let (lon, lat) = county.centroid();
		println!("  {} ({}) around {:.3}, {:.3}", county.name, county.state, lat, lon);
	}
	Ok(())
}
