//! Delegated transaction search with degradation and supersession rules.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::{EntryKind, Transaction};
use crate::errors::CollaboratorError;

use super::generation::{Generation, GenerationCounter};

/// The only fields a search collaborator ever sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub amount: Decimal,
    pub kind: EntryKind,
}

impl From<&Transaction> for SearchCandidate {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id,
            date: txn.date,
            name: txn.name.clone(),
            amount: txn.amount,
            kind: txn.kind,
        }
    }
}

/// External text-matching collaborator. Returns a ranked subset of `candidates`.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        candidates: &[SearchCandidate],
    ) -> Result<Vec<SearchCandidate>, CollaboratorError>;
}

/// Runs `query` through `provider` and maps the ranked candidates back onto `transactions`.
///
/// Blank queries short-circuit to an empty result. Provider failures and calls that take
/// longer than `timeout` also yield an empty result. Ids the provider invents are dropped,
/// as are repeats, so the output is always a reordered subset of the input.
pub fn search_transactions<'a>(
    query: &str,
    transactions: &'a [Transaction],
    provider: &dyn SearchProvider,
    timeout: Duration,
) -> Vec<&'a Transaction> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<SearchCandidate> = transactions.iter().map(SearchCandidate::from).collect();
    let started = Instant::now();
    let outcome = provider.search(query, &candidates);
    let elapsed = started.elapsed();

    let ranked = match outcome {
        Ok(_) if elapsed > timeout => {
            let err = CollaboratorError::TimedOut {
                elapsed_ms: elapsed.as_millis(),
                limit_ms: timeout.as_millis(),
            };
            warn!(query, error = %err, "search degraded to empty result");
            return Vec::new();
        }
        Ok(ranked) => ranked,
        Err(err) => {
            warn!(query, error = %err, "search degraded to empty result");
            return Vec::new();
        }
    };

    let by_id: HashMap<Uuid, &Transaction> = transactions.iter().map(|txn| (txn.id, txn)).collect();
    let mut seen = HashSet::new();
    let results: Vec<&Transaction> = ranked
        .iter()
        .filter_map(|candidate| by_id.get(&candidate.id).copied())
        .filter(|txn| seen.insert(txn.id))
        .collect();
    debug!(
        query,
        returned = ranked.len(),
        kept = results.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "search completed"
    );
    results
}

/// Result of a search whose generation may have been superseded meanwhile.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    Results(T),
    Superseded,
}

impl<T> SearchOutcome<T> {
    pub fn into_results(self) -> Option<T> {
        match self {
            SearchOutcome::Results(results) => Some(results),
            SearchOutcome::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, SearchOutcome::Superseded)
    }
}

/// Search-as-you-type coordinator: each keystroke takes a ticket, and only the newest
/// ticket's results are delivered.
pub struct SearchCoordinator {
    generations: GenerationCounter,
    timeout: Duration,
}

impl SearchCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            generations: GenerationCounter::new(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn begin(&self) -> Generation {
        self.generations.begin()
    }

    pub fn cancel(&self) {
        self.generations.invalidate();
    }

    pub fn is_current(&self, ticket: Generation) -> bool {
        self.generations.is_current(ticket)
    }

    /// Runs the search for `ticket`, skipping the provider entirely if it is already stale.
    pub fn run<'a>(
        &self,
        ticket: Generation,
        query: &str,
        transactions: &'a [Transaction],
        provider: &dyn SearchProvider,
    ) -> SearchOutcome<Vec<&'a Transaction>> {
        if !self.is_current(ticket) {
            return SearchOutcome::Superseded;
        }
        let results = search_transactions(query, transactions, provider, self.timeout);
        self.accept(ticket, results)
    }

    /// Gates a result computed elsewhere (another thread, an aggregation) on its ticket.
    pub fn accept<T>(&self, ticket: Generation, value: T) -> SearchOutcome<T> {
        if self.is_current(ticket) {
            SearchOutcome::Results(value)
        } else {
            debug!(ticket = ticket.value(), "stale result discarded");
            SearchOutcome::Superseded
        }
    }
}
