pub use crate::config::*;

use crate::aggregate_results;

/// A builder for assembling raw vote records incrementally.
///
/// The recording subsystem may emit partial counts for the same
/// (position, candidate) pair over time; the builder simply collects them
/// and the engine sums them at aggregation time.
///
/// ```
/// pub use council_tally::Builder;
/// pub use council_tally::{ProgramTable, ScopeConfig};
/// # use council_tally::TallyErrors;
///
/// let scope = ScopeConfig::with_programs(ProgramTable::empty());
/// let mut builder = Builder::new(&scope)?;
///
/// builder.add_record("Senator", "Alice", 10);
/// builder.add_record("Senator", "Alice", 15);
/// builder.add_record("Senator", "Abstain", 5);
///
/// let outcome = builder.results();
/// let senator = &outcome.results.all_ssc()["Senator"];
/// assert_eq!(senator.candidates[0].votes, 25);
/// assert_eq!(senator.total_votes, 30);
///
/// # Ok::<(), TallyErrors>(())
/// ```
pub struct Builder {
    pub(crate) _scope: ScopeConfig,
    pub(crate) _records: Vec<RawVoteRecord>,
}

impl Builder {
    pub fn new(scope: &ScopeConfig) -> Result<Builder, TallyErrors> {
        Ok(Builder {
            _scope: scope.clone(),
            _records: Vec::new(),
        })
    }

    /// Adds one record with an already-parsed count.
    ///
    /// It is the simplest use case for most callers.
    pub fn add_record(&mut self, position: &str, candidate: &str, votes: u64) {
        self.add_record_value(&RawVoteRecord {
            position: position.to_string(),
            candidate: candidate.to_string(),
            votes: VoteValue::Count(votes),
        });
    }

    /// Adds one record as it came from the recording subsystem. The count
    /// may still be numeric text; coercion happens during the run, and a
    /// count that does not parse is dropped and reported there.
    pub fn add_record_value(&mut self, record: &RawVoteRecord) {
        self._records.push(record.clone());
    }

    /// Runs the aggregation pipeline over the records added so far.
    ///
    /// The builder is not consumed: more records may be added afterwards
    /// and the results rebuilt from scratch.
    pub fn results(&self) -> AggregationResult {
        aggregate_results(&self._records, &self._scope)
    }
}
