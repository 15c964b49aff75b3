mod aggregate;
mod discover;
mod ioutil;
pub mod map;
mod normalize;
mod progress;
mod record;
mod series;
mod sniff;

pub use aggregate::*;
pub use discover::*;
pub use ioutil::magic_open;
pub use normalize::*;
pub use progress::*;
pub use record::*;
pub use series::*;
pub use sniff::*;


// The study window. Yearly outputs always span exactly these years.
pub static FIRST_YEAR: i32 = 2000;
pub static LAST_YEAR: i32 = 2023;
