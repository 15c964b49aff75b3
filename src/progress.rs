use std::io;
use std::io::Write;
use std::time;


pub trait ProgressSink {
	fn update(&mut self, inow: usize);
	fn finish(&mut self, inow: Option<usize>);
}


pub struct ProgressMeter {
	t0: time::Instant,
	tprev: time::Instant,
	iprev: usize,
	n: Option<usize>,
}

impl ProgressMeter {
	pub fn start(n: Option<usize>) -> Self {
		let now = time::Instant::now();
		match n {
			Some(_) => print!("{:6.0}% [{:6.2}/s]\r", 0.0, 0.0),
			None => print!("{:12} [{:6.2}/s]\r", 0, 0.0),
		}
		io::stdout().flush().unwrap();
		Self{
			t0: now,
			tprev: now,
			iprev: 0,
			n,
		}
	}
}

impl ProgressSink for ProgressMeter {
	fn update(&mut self, inow: usize) {
		let now = time::Instant::now();
		let dt = (now - self.tprev).as_secs_f64();
		let rate = (inow - self.iprev) as f64 / dt;
		match self.n {
			Some(n) => {
				let done = (inow as f64) / (n as f64);
				print!("{:6.0}% [{:6.2}/s]\r", done * 100.0, rate);
			},
			None => {
				print!("{:12} [{:6.2}/s]\r", inow, rate);
			},
		}
		io::stdout().flush().unwrap();
		self.iprev = inow;
		self.tprev = now;
	}

	fn finish(&mut self, inow: Option<usize>) {
		let (inow, tnow) = match inow.or(self.n) {
			Some(inow) => (inow, time::Instant::now()),
			None => (self.iprev, self.tprev),
		};
		let dt = (tnow - self.t0).as_secs_f64();
		let rate = inow as f64 / dt;
		match self.n {
			Some(_) => {
				println!("{:6.0}% [{:6.2}/s]\r", 100.0, rate);
			},
			None => {
				println!("{:12} [{:6.2}/s]\r", inow, rate);
			},
		}
		// a finished meter may be handed another loop; start counting afresh
		let now = time::Instant::now();
		self.t0 = now;
		self.tprev = now;
		self.iprev = 0;
	}
}


/// Sink for non-interactive runs; the per-file summaries carry the numbers.
pub struct Silent;

impl ProgressSink for Silent {
	fn update(&mut self, _inow: usize) {}
	fn finish(&mut self, _inow: Option<usize>) {}
}

pub fn default_output() -> Box<dyn ProgressSink> {
	if isatty::stdout_isatty() {
		Box::new(ProgressMeter::start(None))
	} else {
		Box::new(Silent)
	}
}


/// Row-count view on a sink for loops without a known total.
pub struct CountMeter<'x, S: ProgressSink + ?Sized> {
	sink: &'x mut S,
}

impl<'x, S: ProgressSink + ?Sized> CountMeter<'x, S> {
	pub fn new(sink: &'x mut S) -> Self {
		Self{sink}
	}

	pub fn update(&mut self, inow: usize) {
		self.sink.update(inow);
	}

	pub fn finish(self, inow: usize) {
		self.sink.finish(Some(inow));
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn meter_counts_from_zero_after_finish() {
		let mut pm = ProgressMeter::start(None);
		pm.update(100);
		pm.finish(None);
		// second file restarts near zero; must not underflow the rate delta
		pm.update(10);
		pm.finish(Some(10));
	}

	#[test]
	fn count_meter_reuses_sink_across_files() {
		let mut pm = ProgressMeter::start(None);
		{
			let mut cm = CountMeter::new(&mut pm);
			cm.update(500);
			cm.finish(500);
		}
		{
			let mut cm = CountMeter::new(&mut pm);
			cm.update(3);
			cm.finish(3);
		}
	}
}
