use std::fs;
use std::io;
use std::path::{Path, PathBuf};


// Filename prefixes encode the processing stage; later stages pick their
// inputs by these patterns, so they are part of the inter-stage contract.
pub static CLEANED_PREFIX: &'static str = "cleaned_";
pub static DAILY_PREFIX: &'static str = "daily_";
pub static YEARLY_PREFIX: &'static str = "yearly_";


pub fn file_name(path: &Path) -> &str {
	path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

pub fn is_csv(path: &Path) -> bool {
	let name = file_name(path);
	name.ends_with(".csv") || name.ends_with(".csv.gz")
}

pub fn has_stage_prefix(path: &Path) -> bool {
	let name = file_name(path);
	name.starts_with(CLEANED_PREFIX) || name.starts_with(DAILY_PREFIX) || name.starts_with(YEARLY_PREFIX)
}

/// Sibling path with the stage prefix prepended to the file name. A `.gz`
/// suffix is stripped, outputs are always written uncompressed.
pub fn staged_path(path: &Path, prefix: &str) -> PathBuf {
	let mut name = format!("{}{}", prefix, file_name(path));
	if name.ends_with(".gz") {
		name.truncate(name.len() - 3);
	}
	path.with_file_name(name)
}


/// Lazy depth-first walk of a directory tree, yielding the file paths the
/// predicate accepts. Traversal errors surface as items so one unreadable
/// directory does not end the batch.
pub struct FileWalk<F: Fn(&Path) -> bool> {
	pending: Vec<PathBuf>,
	current: Option<fs::ReadDir>,
	predicate: F,
}

pub fn find_files<P: AsRef<Path>, F: Fn(&Path) -> bool>(root: P, predicate: F) -> FileWalk<F> {
	FileWalk{
		pending: vec![root.as_ref().to_path_buf()],
		current: None,
		predicate,
	}
}

impl<F: Fn(&Path) -> bool> Iterator for FileWalk<F> {
	type Item = io::Result<PathBuf>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(rd) = self.current.as_mut() {
				match rd.next() {
					Some(Ok(entry)) => {
						let path = entry.path();
						match entry.file_type() {
							Ok(t) if t.is_dir() => {
								self.pending.push(path);
							},
							Ok(t) if t.is_file() => {
								if (self.predicate)(&path) {
									return Some(Ok(path))
								}
							},
							Ok(_) => (),
							Err(e) => return Some(Err(e)),
						}
					},
					Some(Err(e)) => return Some(Err(e)),
					None => {
						self.current = None;
					},
				}
				continue
			}
			let dir = self.pending.pop()?;
			match fs::read_dir(&dir) {
				Ok(rd) => {
					self.current = Some(rd);
				},
				Err(e) => return Some(Err(e)),
			}
		}
	}
}
