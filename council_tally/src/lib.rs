mod builder;
mod config;
pub mod manual;
pub mod quick_start;

use log::{debug, info, warn};

use std::{
    collections::{BTreeMap, HashMap},
    ops::{Add, AddAssign},
};

pub use crate::builder::Builder;
pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd, Default)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

impl Add for VoteCount {
    type Output = VoteCount;
    fn add(self: VoteCount, rhs: VoteCount) -> VoteCount {
        VoteCount(self.0 + rhs.0)
    }
}

// The separator between the position part and the college part of a local
// race label.
const SCOPE_SEPARATOR: &str = " - ";

// One bucket of the tally while it accumulates: per-candidate counts in
// first-seen order, plus the abstain counter.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
struct BucketTally {
    // Candidate names in the order they were first observed.
    names: Vec<String>,
    indices: HashMap<String, usize>,
    counts: Vec<VoteCount>,
    abstain: VoteCount,
}

impl BucketTally {
    fn add_candidate(&mut self, name: &str, count: VoteCount) {
        let idx = match self.indices.get(name) {
            Some(idx) => *idx,
            None => {
                let idx = self.names.len();
                self.names.push(name.to_string());
                self.counts.push(VoteCount::EMPTY);
                self.indices.insert(name.to_string(), idx);
                idx
            }
        };
        self.counts[idx] += count;
    }

    fn add_abstain(&mut self, count: VoteCount) {
        self.abstain += count;
    }
}

/// Classifies raw position labels into tally buckets.
///
/// The resolver applies, in order: the board member prefix with a mandatory
/// program lookup, the `" - "` split into (position, college), and the
/// school-wide slate. A label that matches none of the shapes does not
/// resolve and the record carrying it must be dropped by the caller;
/// guessing a bucket could merge unrelated races.
pub struct ScopeResolver<'a> {
    scope: &'a ScopeConfig,
}

impl<'a> ScopeResolver<'a> {
    pub fn new(scope: &'a ScopeConfig) -> ScopeResolver<'a> {
        ScopeResolver { scope }
    }

    /// Resolves a position label to its bucket key, or `None` when the
    /// label cannot be classified.
    pub fn resolve(&self, position_label: &str) -> Option<ScopeKey> {
        let label = position_label.trim();

        // Board member races carry a program name after the prefix. The
        // program must be present in the lookup table: an unknown program
        // cannot fall through to the generic split below, which would read
        // it as a college name.
        if let Some(program) = label.strip_prefix(BOARD_MEMBER_PREFIX) {
            let program = program.trim();
            let college = self.scope.programs.college_for_program(program)?;
            return Some(ScopeKey::lsc(
                college,
                &format!("{}{}", BOARD_MEMBER_PREFIX, program),
            ));
        }

        // "<position> - <college>", both parts verbatim after trimming.
        // College names are accepted by shape alone; only program lookups
        // enforce table membership.
        let parts: Vec<&str> = label.split(SCOPE_SEPARATOR).collect();
        if parts.len() == 2 {
            let position = parts[0].trim();
            let college = parts[1].trim();
            if !position.is_empty() && !college.is_empty() {
                return Some(ScopeKey::lsc(college, position));
            }
        }

        // School-wide positions match the configured slate exactly, with no
        // case folding.
        if self.scope.ssc_positions.iter().any(|p| p == label) {
            return Some(ScopeKey::ssc(label));
        }

        None
    }
}

/// Runs the aggregation pipeline over one snapshot of raw vote records.
///
/// Arguments:
/// * `records` the raw (position, candidate, votes) rows to process
/// * `scope` the school-wide slate and the program lookup table
///
/// The run is a pure function of its inputs: the same snapshot always
/// produces the same result set, and concurrent runs share no state. A
/// record that cannot be classified or whose count does not parse is
/// dropped and counted in [DropStats], never partially applied.
pub fn aggregate_results(records: &[RawVoteRecord], scope: &ScopeConfig) -> AggregationResult {
    info!(
        "aggregate_results: processing {:?} records, {:?} colleges in the program table",
        records.len(),
        scope.programs.colleges().count()
    );

    let resolver = ScopeResolver::new(scope);
    let (buckets, dropped) = build_tallies(records, &resolver);
    debug!(
        "aggregate_results: {:?} buckets, dropped: {:?}",
        buckets.len(),
        dropped
    );

    let results = normalize_buckets(buckets);
    if dropped.total() > 0 {
        warn!(
            "aggregate_results: dropped {:?} unresolvable and {:?} malformed records",
            dropped.unresolvable, dropped.malformed
        );
    }
    AggregationResult { results, dropped }
}

// Groups the records into buckets, separating abstain votes from candidate
// votes. Accumulation is additive, so record order never changes the sums.
fn build_tallies(
    records: &[RawVoteRecord],
    resolver: &ScopeResolver,
) -> (BTreeMap<ScopeKey, BucketTally>, DropStats) {
    let mut buckets: BTreeMap<ScopeKey, BucketTally> = BTreeMap::new();
    let mut dropped = DropStats::default();

    for record in records.iter() {
        let count = match record.votes.as_count() {
            Some(c) => VoteCount(c),
            None => {
                warn!(
                    "build_tallies: malformed vote count {:?} for position {:?}, dropping",
                    record.votes, record.position
                );
                dropped.malformed += 1;
                continue;
            }
        };
        let key = match resolver.resolve(&record.position) {
            Some(key) => key,
            None => {
                warn!(
                    "build_tallies: could not resolve position label {:?}, dropping",
                    record.position
                );
                dropped.unresolvable += 1;
                continue;
            }
        };
        let bucket = buckets.entry(key).or_default();
        if is_abstain(&record.candidate) {
            bucket.add_abstain(count);
        } else {
            bucket.add_candidate(record.candidate.trim(), count);
        }
    }
    (buckets, dropped)
}

fn normalize_buckets(buckets: BTreeMap<ScopeKey, BucketTally>) -> ResultSet {
    let mut results = ResultSet::default();
    for (key, bucket) in buckets {
        let pr = normalize_bucket(key, bucket);
        match (pr.scope.track, pr.scope.college.clone()) {
            (Track::Ssc, _) => {
                results.ssc.insert(pr.scope.position.clone(), pr);
            }
            (Track::Lsc, Some(college)) => {
                results
                    .lsc
                    .entry(college)
                    .or_default()
                    .insert(pr.scope.position.clone(), pr);
            }
            (Track::Lsc, None) => {
                // The resolver never emits an LSC key without a college.
                debug!(
                    "normalize_buckets: dropping LSC bucket without a college: {:?}",
                    pr.scope
                );
            }
        }
    }
    results
}

// Derives the position total and the per-slot shares for one bucket.
fn normalize_bucket(scope: ScopeKey, bucket: BucketTally) -> PositionResult {
    let candidate_total: VoteCount = bucket.counts.iter().cloned().sum();
    let total = candidate_total + bucket.abstain;

    // Descending vote count. The sort is stable, so candidates with equal
    // counts keep their first-seen order.
    let mut ordered: Vec<(String, VoteCount)> = bucket
        .names
        .into_iter()
        .zip(bucket.counts.into_iter())
        .collect();
    ordered.sort_by_key(|(_, vc)| std::cmp::Reverse(*vc));

    let candidates: Vec<CandidateResult> = ordered
        .into_iter()
        .map(|(name, vc)| CandidateResult {
            name,
            votes: vc.0,
            percentage: percentage(vc, total),
        })
        .collect();

    PositionResult {
        candidates,
        abstain: AbstainResult {
            votes: bucket.abstain.0,
            percentage: percentage(bucket.abstain, total),
        },
        total_votes: total.0,
        scope,
    }
}

// Share of the position total in [0, 100]. Zero-total positions report zero
// for every slot rather than NaN.
fn percentage(votes: VoteCount, total: VoteCount) -> f64 {
    if total == VoteCount::EMPTY {
        0.0
    } else {
        (votes.0 as f64) * 100.0 / (total.0 as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(position: &str, candidate: &str, votes: u64) -> RawVoteRecord {
        RawVoteRecord {
            position: position.to_string(),
            candidate: candidate.to_string(),
            votes: VoteValue::Count(votes),
        }
    }

    fn rec_text(position: &str, candidate: &str, votes: &str) -> RawVoteRecord {
        RawVoteRecord {
            position: position.to_string(),
            candidate: candidate.to_string(),
            votes: VoteValue::Text(votes.to_string()),
        }
    }

    fn pairs(table: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        table
            .iter()
            .map(|(college, programs)| {
                (
                    college.to_string(),
                    programs.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    fn test_scope() -> ScopeConfig {
        let programs = ProgramTable::new(&pairs(&[
            ("CAFA", &["Bachelor of Science in Architecture"]),
            (
                "CBEA",
                &["Bachelor of Science in Accountancy/Accounting Information System"],
            ),
        ]))
        .unwrap();
        ScopeConfig::with_programs(programs)
    }

    #[test]
    fn resolve_local_race() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        assert_eq!(
            resolver.resolve("Governor - CAFA"),
            Some(ScopeKey::lsc("CAFA", "Governor"))
        );
    }

    #[test]
    fn resolve_school_wide_race() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        assert_eq!(resolver.resolve("Senator"), Some(ScopeKey::ssc("Senator")));
        assert_eq!(
            resolver.resolve("  President  "),
            Some(ScopeKey::ssc("President"))
        );
        // No case folding on position names.
        assert_eq!(resolver.resolve("senator"), None);
    }

    #[test]
    fn resolve_board_member_race() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        let label = "Board Member - Bachelor of Science in Accountancy/Accounting Information System";
        assert_eq!(
            resolver.resolve(label),
            Some(ScopeKey::lsc("CBEA", label))
        );
    }

    #[test]
    fn resolve_board_member_unknown_program() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        // Unknown programs never fall through to the generic split.
        assert_eq!(resolver.resolve("Board Member - Bachelor of Mysteries"), None);
    }

    #[test]
    fn resolve_unknown_college_by_shape() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        assert_eq!(
            resolver.resolve("Mascot - Nowhere"),
            Some(ScopeKey::lsc("Nowhere", "Mascot"))
        );
    }

    #[test]
    fn resolve_rejects_shapeless_labels() {
        let scope = test_scope();
        let resolver = ScopeResolver::new(&scope);
        assert_eq!(resolver.resolve("Mystery Role"), None);
        assert_eq!(resolver.resolve("A - B - C"), None);
        assert_eq!(resolver.resolve(" - CAFA"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn counts_accumulate_in_any_order() {
        let scope = test_scope();
        let forward = vec![rec("Senator", "Alice", 10), rec("Senator", "Alice", 15)];
        let backward = vec![rec("Senator", "Alice", 15), rec("Senator", "Alice", 10)];

        let res_fwd = aggregate_results(&forward, &scope);
        let res_bwd = aggregate_results(&backward, &scope);
        assert_eq!(res_fwd, res_bwd);

        let senator = &res_fwd.results.all_ssc()["Senator"];
        assert_eq!(senator.candidates.len(), 1);
        assert_eq!(senator.candidates[0].name, "Alice");
        assert_eq!(senator.candidates[0].votes, 25);
    }

    #[test]
    fn abstain_variants_sum_into_one_slot() {
        let scope = test_scope();
        let records = vec![
            rec("President", "Abstain", 3),
            rec("President", "ABSTAIN ", 2),
        ];
        let res = aggregate_results(&records, &scope);
        let president = &res.results.all_ssc()["President"];
        assert_eq!(president.abstain.votes, 5);
        assert_eq!(president.total_votes, 5);
        assert!(president.candidates.is_empty());
    }

    #[test]
    fn abstain_slot_present_when_empty() {
        let scope = test_scope();
        let records = vec![rec("Senator", "Alice", 4)];
        let res = aggregate_results(&records, &scope);
        let senator = &res.results.all_ssc()["Senator"];
        assert_eq!(senator.abstain.votes, 0);
        assert_eq!(senator.abstain.percentage, 0.0);
        assert_eq!(senator.percentage_of("abstain "), Some(0.0));
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let scope = test_scope();
        let records = vec![
            rec("Governor - CAFA", "Alice", 7),
            rec("Governor - CAFA", "Bob", 5),
            rec("Governor - CAFA", "Abstain", 3),
        ];
        let res = aggregate_results(&records, &scope);
        let governor = &res.results.lsc_for_college("CAFA")["Governor"];
        assert_eq!(governor.total_votes, 15);
        let sum: f64 = governor
            .candidates
            .iter()
            .map(|c| c.percentage)
            .sum::<f64>()
            + governor.abstain.percentage;
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_position_has_zero_percentages() {
        let scope = test_scope();
        let records = vec![rec("Senator", "Alice", 0), rec("Senator", "Abstain", 0)];
        let res = aggregate_results(&records, &scope);
        let senator = &res.results.all_ssc()["Senator"];
        assert_eq!(senator.total_votes, 0);
        assert_eq!(senator.candidates[0].percentage, 0.0);
        assert_eq!(senator.abstain.percentage, 0.0);
    }

    #[test]
    fn candidate_order_is_votes_then_first_seen() {
        let scope = test_scope();
        let records = vec![
            rec("Senator", "Carol", 4),
            rec("Senator", "Alice", 9),
            rec("Senator", "Bob", 4),
            rec("Senator", "Dave", 2),
        ];
        let res = aggregate_results(&records, &scope);
        let names: Vec<&str> = res.results.all_ssc()["Senator"]
            .candidates
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        // Carol and Bob are tied; Carol was observed first.
        assert_eq!(names, vec!["Alice", "Carol", "Bob", "Dave"]);
    }

    #[test]
    fn candidate_names_are_trimmed_for_keying() {
        let scope = test_scope();
        let records = vec![rec("Senator", "Alice", 10), rec("Senator", " Alice ", 5)];
        let res = aggregate_results(&records, &scope);
        let senator = &res.results.all_ssc()["Senator"];
        assert_eq!(senator.candidates.len(), 1);
        assert_eq!(senator.candidates[0].votes, 15);
    }

    #[test]
    fn unresolvable_records_are_dropped_and_counted() {
        let scope = test_scope();
        let records = vec![
            rec("Senator", "Alice", 10),
            rec("Mystery Role", "Bob", 99),
            rec("Board Member - Bachelor of Mysteries", "Carol", 42),
        ];
        let res = aggregate_results(&records, &scope);
        assert_eq!(res.dropped.unresolvable, 2);
        assert_eq!(res.dropped.malformed, 0);
        assert_eq!(res.results.len(), 1);
        assert_eq!(res.results.all_ssc()["Senator"].total_votes, 10);
    }

    #[test]
    fn malformed_counts_are_dropped_and_counted() {
        let scope = test_scope();
        let records = vec![
            rec_text("Senator", "Alice", "25"),
            rec_text("Senator", "Alice", "twenty"),
            rec_text("Senator", "Bob", "-3"),
        ];
        let res = aggregate_results(&records, &scope);
        assert_eq!(res.dropped.malformed, 2);
        let senator = &res.results.all_ssc()["Senator"];
        assert_eq!(senator.candidates.len(), 1);
        assert_eq!(senator.candidates[0].votes, 25);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let scope = test_scope();
        let records = vec![
            rec("Senator", "Alice", 10),
            rec("Governor - CAFA", "Bob", 5),
            rec(
                "Board Member - Bachelor of Science in Architecture",
                "Carol",
                7,
            ),
            rec("Governor - CAFA", "Abstain", 1),
        ];
        let first = aggregate_results(&records, &scope);
        let second = aggregate_results(&records, &scope);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_college_query_is_empty_not_an_error() {
        let scope = test_scope();
        let records = vec![rec("Governor - CAFA", "Alice", 3)];
        let res = aggregate_results(&records, &scope);
        assert!(res.results.lsc_for_college("COE").is_empty());
        assert_eq!(res.results.lsc_for_college("CAFA").len(), 1);
    }

    #[test]
    fn keyed_lookup() {
        let scope = test_scope();
        let records = vec![
            rec("Senator", "Alice", 3),
            rec("Governor - CAFA", "Bob", 2),
        ];
        let res = aggregate_results(&records, &scope);
        assert!(res.results.get(&ScopeKey::ssc("Senator")).is_some());
        assert!(res.results.get(&ScopeKey::lsc("CAFA", "Governor")).is_some());
        assert!(res.results.get(&ScopeKey::lsc("CAFA", "Senator")).is_none());
    }

    #[test]
    fn ambiguous_program_table_is_rejected() {
        let table = ProgramTable::new(&pairs(&[
            ("CAFA", &["Bachelor of Science in Architecture"]),
            ("COE", &["Bachelor of Science in Architecture"]),
        ]));
        assert_eq!(
            table,
            Err(TallyErrors::AmbiguousProgram(
                "Bachelor of Science in Architecture".to_string()
            ))
        );
    }

    #[test]
    fn duplicate_college_is_rejected() {
        let table = ProgramTable::new(&pairs(&[("CAFA", &[]), ("CAFA", &[])]));
        assert_eq!(
            table,
            Err(TallyErrors::DuplicateCollege("CAFA".to_string()))
        );
    }
}
