//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target or print
//! them as JSON.

mod check;
mod output;
mod pairs;

pub use check::CheckReport;
pub use output::{Report, TerminalOutput};
pub use pairs::{PairGroup, PairsReport};
