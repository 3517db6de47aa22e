//! Pairs command report data structures.

use serde::Serialize;

use super::output::{Output, Report};

/// Pairs registered by one contributor group.
#[derive(Debug, Serialize)]
pub struct PairGroup {
    /// Where the pairs come from, e.g. `module users` or `assembly sample`.
    pub origin: String,
    /// The pairs, as `Source -> Destination` with short type names.
    pub pairs: Vec<String>,
}

/// Report data listing registered pairs.
#[derive(Debug, Serialize)]
pub struct PairsReport {
    pub groups: Vec<PairGroup>,
    /// Rules in the combined store (later contributions override earlier ones).
    pub total: usize,
}

impl Report for PairsReport {
    fn render(&self, out: &mut dyn Output) {
        for group in &self.groups {
            out.section(&group.origin);
            if group.pairs.is_empty() {
                out.preformatted("  (none)");
            }
            for pair in &group.pairs {
                out.list_item(pair);
            }
        }

        out.newline();
        out.preformatted(&format!(
            "{} rule{} registered",
            self.total,
            if self.total == 1 { "" } else { "s" }
        ));
    }
}
