//! Double-elimination bracket core
//!
//! This crate owns the bracket itself:
//! - Building a double-elimination bracket over any field size, padded with byes
//! - Propagating results (winners advance, losers drop, grand final reset)
//! - Locating the matches that can be played right now
//! - Deriving final standings once the grand final is decided
//!
//! Storage is abstracted behind [`BracketStore`] so the locator and the result
//! applier work against any backend that can select and update match records.

mod applier;
mod builder;
mod error;
mod locator;
mod model;
mod progression;
mod standings;
mod store;

pub use applier::*;
pub use builder::*;
pub use error::*;
pub use locator::*;
pub use model::*;
pub use standings::*;
pub use store::*;
