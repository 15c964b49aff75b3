//! Static outlines of the studied counties, for an external GeoJSON
//! renderer. Purely presentational; nothing here touches the pipeline.

use std::fmt;

use serde_json::{json, Value};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
	Virginia,
	Maryland,
	DistrictOfColumbia,
}

impl State {
	pub fn code(&self) -> &'static str {
		match self {
			Self::Virginia => "VA",
			Self::Maryland => "MD",
			Self::DistrictOfColumbia => "DC",
		}
	}

	pub fn fill_color(&self) -> &'static str {
		match self {
			Self::Virginia => "#FF8080",
			Self::Maryland => "#8080FF",
			Self::DistrictOfColumbia => "#80FF80",
		}
	}
}

impl fmt::Display for State {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.code())
	}
}


/// One county boundary as a closed (lon, lat) ring, first point repeated
/// last per the GeoJSON polygon convention.
#[derive(Debug, Clone)]
pub struct CountyOutline {
	pub name: &'static str,
	pub state: State,
	pub ring: &'static [(f64, f64)],
}

impl CountyOutline {
	pub fn centroid(&self) -> (f64, f64) {
		let n = self.ring.len() as f64;
		let (mut lon, mut lat) = (0.0, 0.0);
		for (x, y) in self.ring {
			lon += x;
			lat += y;
		}
		(lon / n, lat / n)
	}
}


static COUNTIES: &'static [CountyOutline] = &[
	CountyOutline{
		name: "Fairfax",
		state: State::Virginia,
		ring: &[
			(-77.31, 38.71), (-77.31, 38.98), (-77.12, 38.98),
			(-77.12, 38.84), (-77.04, 38.84), (-77.04, 38.71),
			(-77.31, 38.71),
		],
	},
	CountyOutline{
		name: "Frederick",
		state: State::Maryland,
		ring: &[
			(-77.69, 39.21), (-77.69, 39.72), (-77.16, 39.72),
			(-77.16, 39.21), (-77.69, 39.21),
		],
	},
	CountyOutline{
		name: "Howard",
		state: State::Maryland,
		ring: &[
			(-77.01, 39.13), (-77.01, 39.34), (-76.71, 39.34),
			(-76.71, 39.13), (-77.01, 39.13),
		],
	},
	CountyOutline{
		name: "Montgomery",
		state: State::Maryland,
		ring: &[
			(-77.33, 38.93), (-77.33, 39.28), (-76.97, 39.28),
			(-76.97, 38.93), (-77.33, 38.93),
		],
	},
	CountyOutline{
		name: "Prince Georges",
		state: State::Maryland,
		ring: &[
			(-76.97, 38.7), (-76.97, 39.1), (-76.71, 39.1),
			(-76.71, 38.7), (-76.97, 38.7),
		],
	},
	CountyOutline{
		name: "Loudoun",
		state: State::Virginia,
		ring: &[
			(-77.95, 38.83), (-77.95, 39.33), (-77.31, 39.33),
			(-77.31, 38.83), (-77.95, 38.83),
		],
	},
	CountyOutline{
		name: "Prince William",
		state: State::Virginia,
		ring: &[
			(-77.65, 38.53), (-77.65, 38.88), (-77.31, 38.88),
			(-77.31, 38.53), (-77.65, 38.53),
		],
	},
	CountyOutline{
		name: "Arlington",
		state: State::Virginia,
		ring: &[
			(-77.17, 38.83), (-77.17, 38.93), (-77.04, 38.93),
			(-77.04, 38.83), (-77.17, 38.83),
		],
	},
	CountyOutline{
		name: "Alexandria",
		state: State::Virginia,
		ring: &[
			(-77.14, 38.77), (-77.14, 38.86), (-77.04, 38.86),
			(-77.04, 38.77), (-77.14, 38.77),
		],
	},
	CountyOutline{
		name: "District of Columbia",
		state: State::DistrictOfColumbia,
		ring: &[
			(-77.12, 38.79), (-77.12, 38.995), (-76.909, 38.995),
			(-76.909, 38.79), (-77.12, 38.79),
		],
	},
];

pub fn study_counties() -> &'static [CountyOutline] {
	COUNTIES
}


/// A GeoJSON FeatureCollection with name, state and fill color on each
/// feature; styling keys follow the common simplestyle convention.
pub fn to_geojson(counties: &[CountyOutline]) -> Value {
	let features: Vec<Value> = counties
		.iter()
		.map(|county| {
			let ring: Vec<Value> = county.ring.iter().map(|(x, y)| json!([x, y])).collect();
			json!({
				"type": "Feature",
				"properties": {
					"name": county.name,
					"state": county.state.code(),
					"fill": county.state.fill_color(),
					"fill-opacity": 0.4,
					"stroke": "#000000",
					"stroke-width": 1.5,
				},
				"geometry": {
					"type": "Polygon",
					"coordinates": [ring],
				},
			})
		})
		.collect();
	json!({
		"type": "FeatureCollection",
		"features": features,
	})
}
