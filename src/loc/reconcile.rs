// Cache reconciliation.
// Pairs live repositories with cached records by hash, recomputes stale ones, and persists the result.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::cache::{CacheFile, CacheRecord, CacheStore, repo_hash, validate_shape};
use crate::error::{LocError, Result};
use crate::github::{QueryService, RepositoryRef};
use crate::metrics::QueryMetrics;

use super::aggregate::{RunTotals, aggregate};
use super::recompute::{Recomputed, recompute};

/// Records after a reconciliation pass, complete or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileState {
    /// One record per live repository, in listing order.
    pub records: Vec<CacheRecord>,
    /// Repositories whose history was walked.
    pub recomputed: usize,
}

/// A pass that stopped on a fetch error. Records not yet reached keep
/// their baseline values.
#[derive(Debug)]
pub struct PartialReconcile {
    pub state: ReconcileState,
    pub error: LocError,
}

/// Final records and totals of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub records: Vec<CacheRecord>,
    pub totals: RunTotals,
}

/// Brings one user's cache file in line with the live repository list.
pub struct Reconciler<'a> {
    store: &'a CacheStore,
    author_id: &'a str,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a CacheStore, author_id: &'a str) -> Self {
        Self { store, author_id }
    }

    /// Reconcile `live` against the cache and persist the records.
    ///
    /// On a fetch error the records processed so far are written before the
    /// error is returned, so the next run resumes from them.
    pub async fn reconcile<S: QueryService + ?Sized>(
        &self,
        service: &mut S,
        live: &[RepositoryRef],
        force_recompute: bool,
        metrics: &mut QueryMetrics,
    ) -> Result<Reconciliation> {
        let file = self.store.load_or_create()?;
        let header = file.header.clone();
        let (baseline, reset) = self.baseline(file, live, force_recompute);

        match self.reconcile_records(service, live, baseline, metrics).await {
            Ok(state) => {
                self.persist(header, state.records.clone())?;
                let served_from_cache = !reset && state.recomputed == 0;
                info!(
                    repositories = live.len(),
                    recomputed = state.recomputed,
                    served_from_cache,
                    "reconciled LOC cache"
                );
                Ok(Reconciliation {
                    totals: aggregate(&state.records, served_from_cache),
                    records: state.records,
                })
            }
            Err(partial) => {
                warn!(
                    path = %self.store.path().display(),
                    recomputed = partial.state.recomputed,
                    error = %partial.error,
                    "fetch failed, saving partial cache"
                );
                self.persist(header, partial.state.records)?;
                Err(partial.error)
            }
        }
    }

    /// Starting records for a pass, and whether the cache was discarded.
    ///
    /// A record count that differs from the live repository count, or a
    /// forced run, zeroes every record. Otherwise cached records are matched
    /// to live repositories by hash, in file order when a hash repeats;
    /// unmatched repositories start at zero.
    pub fn baseline(
        &self,
        file: CacheFile,
        live: &[RepositoryRef],
        force_recompute: bool,
    ) -> (Vec<CacheRecord>, bool) {
        let hashes = live.iter().map(|repo| repo_hash(&repo.qualified_name));

        if force_recompute || !validate_shape(&file, live.len()) {
            info!(
                cached = file.records.len(),
                live = live.len(),
                forced = force_recompute,
                "invalidating LOC cache"
            );
            return (hashes.map(CacheRecord::zeroed).collect(), true);
        }

        let mut cached: HashMap<String, VecDeque<CacheRecord>> =
            HashMap::with_capacity(file.records.len());
        for record in file.records {
            cached
                .entry(record.repo_hash.clone())
                .or_default()
                .push_back(record);
        }

        let records = live
            .iter()
            .zip(hashes)
            .map(|(repo, hash)| {
                let matched = cached.get_mut(&hash).and_then(VecDeque::pop_front);
                matched.unwrap_or_else(|| {
                    debug!(repo = %repo.qualified_name, "no cached record for repository");
                    CacheRecord::zeroed(hash)
                })
            })
            .collect();

        (records, false)
    }

    /// Recompute every record whose commit count no longer matches.
    pub async fn reconcile_records<S: QueryService + ?Sized>(
        &self,
        service: &mut S,
        live: &[RepositoryRef],
        mut records: Vec<CacheRecord>,
        metrics: &mut QueryMetrics,
    ) -> std::result::Result<ReconcileState, PartialReconcile> {
        let mut recomputed = 0;
        let mut failure = None;

        for (repo, record) in live.iter().zip(records.iter_mut()) {
            if record.is_current(repo.live_commit_count) {
                continue;
            }

            let outcome = match repo.owner_and_name() {
                Some((owner, name)) => {
                    recompute(service, owner, name, self.author_id, metrics).await
                }
                None => {
                    warn!(repo = %repo.qualified_name, "repository name has no owner");
                    Ok(Recomputed::MissingHistory)
                }
            };

            match outcome {
                Ok(outcome) => {
                    let tally = outcome.tally();
                    record.cached_commit_count = match outcome {
                        Recomputed::Tallied(_) => repo.live_commit_count,
                        Recomputed::MissingHistory => 0,
                    };
                    record.author_commit_count = tally.author_commits;
                    record.additions = tally.additions;
                    record.deletions = tally.deletions;
                }
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
            recomputed += 1;
        }

        let state = ReconcileState {
            records,
            recomputed,
        };
        match failure {
            Some(error) => Err(PartialReconcile { state, error }),
            None => Ok(state),
        }
    }

    fn persist(&self, header: Vec<String>, records: Vec<CacheRecord>) -> Result<()> {
        self.store.write(&CacheFile { header, records })
    }
}
