//! Tournament Runner for chess bots
//!
//! This crate drives a double-elimination tournament on top of `bracket_core`:
//! - Resolving each bracket match with a best-of-three series
//! - Tracking head-to-head records between bots
//! - Producing summaries and final standings for reporting
//!
//! Games themselves are played by an external [`GamePlayer`].
//!
//! # Usage
//!
//! ```bash
//! # Run a simulated tournament from a config file
//! cargo run -p tournament -- run tournament.toml
//!
//! # Same, also writing the JSON summary
//! cargo run -p tournament -- run tournament.toml --json summary.json
//! ```

mod competitor;
mod config;
mod driver;
mod error;
mod game;
mod ledger;
mod series;
mod simulated;
mod summary;

pub use competitor::*;
pub use config::*;
pub use driver::*;
pub use error::*;
pub use game::*;
pub use ledger::*;
pub use series::*;
pub use simulated::*;
pub use summary::*;
