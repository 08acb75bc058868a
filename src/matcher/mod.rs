//! Pattern matching for canonical address strings.

mod pattern;

pub use pattern::Pattern;
