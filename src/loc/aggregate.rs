// LOC aggregation.
// Sums reconciled cache records into run totals.

use serde::{Deserialize, Serialize};

use crate::cache::CacheRecord;

/// Totals for one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub total_additions: u64,
    pub total_deletions: u64,
    /// `total_additions - total_deletions`; negative when more was removed.
    pub net_loc: i64,
    /// No repository needed recomputation and the record count matched.
    pub served_from_cache: bool,
}

/// Sum additions and deletions across `records`.
///
/// Sums saturate at `u64::MAX` and `net_loc` is clamped to the `i64` range,
/// so a corrupt cache value skews the totals instead of aborting the run.
pub fn aggregate(records: &[CacheRecord], served_from_cache: bool) -> RunTotals {
    let (total_additions, total_deletions) =
        records.iter().fold((0u64, 0u64), |(add, del), r| {
            (add.saturating_add(r.additions), del.saturating_add(r.deletions))
        });

    let net = i128::from(total_additions) - i128::from(total_deletions);
    let net_loc = i64::try_from(net).unwrap_or(if net < 0 { i64::MIN } else { i64::MAX });

    RunTotals {
        total_additions,
        total_deletions,
        net_loc,
        served_from_cache,
    }
}
