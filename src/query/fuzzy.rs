use strsim::jaro_winkler;

use crate::errors::CollaboratorError;

use super::search::{SearchCandidate, SearchProvider};

const DEFAULT_THRESHOLD: f64 = 0.85;

/// In-process search provider: substring hits first, then Jaro-Winkler near misses.
#[derive(Debug, Clone, Copy)]
pub struct FuzzySearch {
    threshold: f64,
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FuzzySearch {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// Best match score in `[0, 1]` for `query` (already lowercased) against one candidate.
    pub fn score(&self, query: &str, candidate: &SearchCandidate) -> f64 {
        let name = candidate.name.to_lowercase();
        if name.contains(query) {
            return 1.0;
        }
        let exact_fields = [
            candidate.kind.keyword().to_string(),
            candidate.amount.to_string(),
            candidate.date.to_string(),
        ];
        if exact_fields.iter().any(|field| field.contains(query)) {
            return 0.95;
        }
        name.split_whitespace()
            .map(|word| jaro_winkler(query, word))
            .chain(std::iter::once(jaro_winkler(query, &name)))
            .fold(0.0, f64::max)
    }
}

impl SearchProvider for FuzzySearch {
    fn search(
        &self,
        query: &str,
        candidates: &[SearchCandidate],
    ) -> Result<Vec<SearchCandidate>, CollaboratorError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let mut scored: Vec<(f64, &SearchCandidate)> = candidates
            .iter()
            .map(|candidate| (self.score(&needle, candidate), candidate))
            .filter(|(score, _)| *score >= self.threshold)
            .collect();
        // Stable sort keeps input order among equal scores.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .map(|(_, candidate)| candidate.clone())
            .collect())
    }
}
