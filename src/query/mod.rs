//! Filtering and search over transaction lists.

pub mod filter;
pub mod fuzzy;
pub mod generation;
pub mod search;

pub use filter::{filter_by_period, TransactionFilter};
pub use fuzzy::FuzzySearch;
pub use generation::{Generation, GenerationCounter};
pub use search::{
    search_transactions, SearchCandidate, SearchCoordinator, SearchOutcome, SearchProvider,
};
