use std::io;
use std::io::Read;
use std::fs;
use std::path::Path;

use flate2;


/// Open a file for reading, transparently decompressing `.gz` inputs.
pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			let f = io::BufReader::new(fs::File::open(path)?);
			Ok(Box::new(flate2::read::GzDecoder::new(f)))
		},
		_ => Ok(Box::new(fs::File::open(path)?)),
	}
}
