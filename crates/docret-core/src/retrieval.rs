//! Distance-threshold admission of query results.

use crate::models::QueryResult;
use tracing::debug;

/// Result of filtering a ranked hit list.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// Hits with `distance <= max_distance`, in the order the index gave them
    Admitted(Vec<QueryResult>),
    /// Nothing cleared the threshold. `closest` is the smallest distance seen,
    /// `None` when the index returned no hits at all.
    NoConfidentMatch {
        candidates: usize,
        closest: Option<f32>,
    },
}

impl RetrievalOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, RetrievalOutcome::Admitted(_))
    }
}

/// Keep exactly the results with `distance <= max_distance`. Order and
/// contents of admitted results are untouched.
pub fn filter(results: Vec<QueryResult>, max_distance: f32) -> RetrievalOutcome {
    let candidates = results.len();
    let closest = results
        .iter()
        .map(|r| r.distance)
        .fold(None, |acc: Option<f32>, d| Some(acc.map_or(d, |a| a.min(d))));

    let admitted: Vec<QueryResult> = results
        .into_iter()
        .filter(|r| r.distance <= max_distance)
        .collect();

    debug!(
        "Admitted {}/{} results at max_distance {}",
        admitted.len(),
        candidates,
        max_distance
    );

    if admitted.is_empty() {
        RetrievalOutcome::NoConfidentMatch {
            candidates,
            closest,
        }
    } else {
        RetrievalOutcome::Admitted(admitted)
    }
}
