// ********* Input data structures ***********

use std::collections::{BTreeMap, HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

/// A raw vote count as emitted by the vote-recording subsystem.
///
/// Depending on the upstream serializer, counts arrive either as plain
/// integers or as numeric text. The coercion to an integer happens inside
/// the engine so that a malformed count can be dropped and counted instead
/// of aborting the whole run.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum VoteValue {
    Count(u64),
    Text(String),
}

impl VoteValue {
    /// The integer value of this count, if it has one.
    ///
    /// Text is trimmed and parsed in base 10. Negative or non-numeric text
    /// has no value.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            VoteValue::Count(c) => Some(*c),
            VoteValue::Text(s) => s.trim().parse::<u64>().ok(),
        }
    }
}

impl From<u64> for VoteValue {
    fn from(c: u64) -> VoteValue {
        VoteValue::Count(c)
    }
}

impl From<&str> for VoteValue {
    fn from(s: &str) -> VoteValue {
        VoteValue::Text(s.to_string())
    }
}

/// One row of the raw tally: a position label, a candidate label and the
/// count recorded for that pair.
///
/// The same (position, candidate) pair may appear in any number of rows;
/// the counts add up. Sources that emit partial or incremental counts rely
/// on this.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawVoteRecord {
    pub position: String,
    pub candidate: String,
    pub votes: VoteValue,
}

// ********* Scope identity *********

/// The two election tracks.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Track {
    /// School-wide positions, independent of any college.
    Ssc,
    /// Local council positions, qualified by college.
    Lsc,
}

/// The identity of one tally bucket.
///
/// Invariant: `college` is present exactly for LSC keys.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct ScopeKey {
    pub track: Track,
    pub college: Option<String>,
    pub position: String,
}

impl ScopeKey {
    /// Key of a school-wide position.
    pub fn ssc(position: &str) -> ScopeKey {
        ScopeKey {
            track: Track::Ssc,
            college: None,
            position: position.to_string(),
        }
    }

    /// Key of a local position within a college.
    pub fn lsc(college: &str, position: &str) -> ScopeKey {
        ScopeKey {
            track: Track::Lsc,
            college: Some(college.to_string()),
            position: position.to_string(),
        }
    }
}

// ********* Configuration **********

/// The school-wide positions. Deployments may override the slate through
/// the scope configuration artifact.
pub const DEFAULT_SSC_POSITIONS: [&str; 3] = ["President", "Vice President", "Senator"];

/// The label prefix of the multi-seat board member races. The remainder of
/// such a label is a degree program name, not a college name.
pub const BOARD_MEMBER_PREFIX: &str = "Board Member - ";

/// The candidate label reserved for voters who declined to pick a candidate.
pub const ABSTAIN: &str = "Abstain";

/// Returns true when a candidate label is the abstain sentinel. The match
/// ignores case and surrounding whitespace; everything else about candidate
/// labels is verbatim.
pub fn is_abstain(candidate: &str) -> bool {
    candidate.trim().eq_ignore_ascii_case(ABSTAIN)
}

/// The college → program lookup used to resolve board member races.
///
/// The table encodes the curricular structure of the institution. It is
/// supplied as external configuration so that curriculum changes do not
/// require code changes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ProgramTable {
    colleges: Vec<(String, Vec<String>)>,
    college_by_program: HashMap<String, String>,
}

impl ProgramTable {
    /// A table with no colleges. Board member races will not resolve.
    pub fn empty() -> ProgramTable {
        ProgramTable {
            colleges: Vec::new(),
            college_by_program: HashMap::new(),
        }
    }

    /// Builds the lookup from (college, ordered program list) pairs.
    ///
    /// A program listed under two different colleges or a college listed
    /// twice is a configuration error: resolving through an ambiguous table
    /// could merge unrelated races.
    pub fn new(colleges: &[(String, Vec<String>)]) -> Result<ProgramTable, TallyErrors> {
        let mut college_by_program: HashMap<String, String> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (college, programs) in colleges.iter() {
            if !seen.insert(college.clone()) {
                return Err(TallyErrors::DuplicateCollege(college.clone()));
            }
            for program in programs.iter() {
                let key = program.trim().to_string();
                if let Some(previous) = college_by_program.insert(key, college.clone()) {
                    if previous != *college {
                        return Err(TallyErrors::AmbiguousProgram(program.trim().to_string()));
                    }
                }
            }
        }
        Ok(ProgramTable {
            colleges: colleges.to_vec(),
            college_by_program,
        })
    }

    /// The college owning a program, matched verbatim after trimming.
    pub fn college_for_program(&self, program: &str) -> Option<&str> {
        self.college_by_program
            .get(program.trim())
            .map(|c| c.as_str())
    }

    /// The colleges of the table, in declaration order.
    pub fn colleges(&self) -> impl Iterator<Item = &str> {
        self.colleges.iter().map(|(college, _)| college.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.colleges.is_empty()
    }
}

/// Everything the scope resolver needs to classify a position label.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ScopeConfig {
    pub ssc_positions: Vec<String>,
    pub programs: ProgramTable,
}

impl ScopeConfig {
    pub fn new(ssc_positions: &[String], programs: ProgramTable) -> ScopeConfig {
        ScopeConfig {
            ssc_positions: ssc_positions.to_vec(),
            programs,
        }
    }

    /// A configuration with the default school-wide slate.
    pub fn with_programs(programs: ProgramTable) -> ScopeConfig {
        ScopeConfig {
            ssc_positions: DEFAULT_SSC_POSITIONS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            programs,
        }
    }
}

// ******** Output data structures *********

/// The tally of one candidate within a position.
#[derive(PartialEq, Debug, Clone)]
pub struct CandidateResult {
    pub name: String,
    pub votes: u64,
    /// Share of the position total, in [0, 100]. Zero when the total is zero.
    pub percentage: f64,
}

/// The abstain slot of a position. Always present, possibly with zero votes.
#[derive(PartialEq, Debug, Clone)]
pub struct AbstainResult {
    pub votes: u64,
    pub percentage: f64,
}

/// The fully derived results of one position.
///
/// Candidates are ordered by descending vote count; candidates with equal
/// counts keep the order in which they were first observed in the input.
#[derive(PartialEq, Debug, Clone)]
pub struct PositionResult {
    pub scope: ScopeKey,
    pub candidates: Vec<CandidateResult>,
    pub abstain: AbstainResult,
    /// Sum of all candidate votes and the abstain votes.
    pub total_votes: u64,
}

impl PositionResult {
    /// The percentage slot for a candidate name. The abstain sentinel names
    /// the abstain slot.
    pub fn percentage_of(&self, name: &str) -> Option<f64> {
        if is_abstain(name) {
            return Some(self.abstain.percentage);
        }
        self.candidates
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.percentage)
    }
}

/// The complete outcome of one aggregation run.
///
/// There is no mutation API: a result set is built fresh per run and only
/// read afterwards. The maps are ordered so that two runs over the same
/// snapshot serialize identically.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ResultSet {
    pub(crate) ssc: BTreeMap<String, PositionResult>,
    pub(crate) lsc: BTreeMap<String, BTreeMap<String, PositionResult>>,
}

impl ResultSet {
    /// All school-wide positions, keyed by position name.
    pub fn all_ssc(&self) -> &BTreeMap<String, PositionResult> {
        &self.ssc
    }

    /// The local positions of one college. Unknown or vote-less colleges
    /// yield an empty map, not an error.
    pub fn lsc_for_college(&self, college: &str) -> &BTreeMap<String, PositionResult> {
        static EMPTY: BTreeMap<String, PositionResult> = BTreeMap::new();
        self.lsc.get(college).unwrap_or(&EMPTY)
    }

    /// All local results, college by college.
    pub fn lsc(&self) -> &BTreeMap<String, BTreeMap<String, PositionResult>> {
        &self.lsc
    }

    /// Keyed lookup.
    pub fn get(&self, key: &ScopeKey) -> Option<&PositionResult> {
        match (key.track, key.college.as_ref()) {
            (Track::Ssc, None) => self.ssc.get(&key.position),
            (Track::Lsc, Some(college)) => {
                self.lsc.get(college).and_then(|m| m.get(&key.position))
            }
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ssc.is_empty() && self.lsc.is_empty()
    }

    /// Number of positions across both tracks.
    pub fn len(&self) -> usize {
        self.ssc.len() + self.lsc.values().map(|m| m.len()).sum::<usize>()
    }
}

/// Per-run drop accounting, by cause.
///
/// These counts are the observability hook for configuration drift: a new
/// program missing from the lookup table shows up here as unresolvable
/// records rather than disappearing silently.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct DropStats {
    /// The position label matched none of the recognized shapes.
    pub unresolvable: u64,
    /// The vote count did not parse as a non-negative integer.
    pub malformed: u64,
}

impl DropStats {
    pub fn total(&self) -> u64 {
        self.unresolvable + self.malformed
    }
}

/// The outcome of an aggregation run: the result set plus drop accounting.
#[derive(PartialEq, Debug, Clone)]
pub struct AggregationResult {
    pub results: ResultSet,
    pub dropped: DropStats,
}

/// Configuration errors. The aggregation run itself never fails: bad
/// records are dropped and counted instead.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyErrors {
    /// A program is listed under two different colleges.
    AmbiguousProgram(String),
    /// A college appears twice in the program table.
    DuplicateCollege(String),
}

impl Error for TallyErrors {}

impl Display for TallyErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyErrors::AmbiguousProgram(program) => {
                write!(f, "program {:?} is listed under more than one college", program)
            }
            TallyErrors::DuplicateCollege(college) => {
                write!(f, "college {:?} is listed more than once", college)
            }
        }
    }
}
