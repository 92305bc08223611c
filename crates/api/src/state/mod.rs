// Path: crates/api/src/state/mod.rs
//! Core traits for state access, plus the layers stacked on top of it.

mod accessor;
mod overlay;
mod read_set;

pub use accessor::*;
pub use overlay::*;
pub use read_set::*;

#[cfg(test)]
mod tests;
