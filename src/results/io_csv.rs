// Primitives for reading vote counts from CSV files.

use log::debug;

use snafu::prelude::*;

use council_tally::{RawVoteRecord, VoteValue};

use crate::results::{
    CsvLineParseSnafu, CsvLineTooShortSnafu, CsvOpenSnafu, ResultsResult,
};

// Columns, in order: position, candidate, votes.
pub fn read_csv_records(path: String) -> ResultsResult<Vec<RawVoteRecord>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.clone())
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<RawVoteRecord> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu {})?;
        debug!("read_csv_records: {:?} {:?}", lineno, line);

        let position = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        // An optional header row is recognized by its first column.
        if lineno == 1 && position.trim().eq_ignore_ascii_case("position") {
            continue;
        }
        let candidate = line.get(1).context(CsvLineTooShortSnafu { lineno })?;
        let votes = line.get(2).context(CsvLineTooShortSnafu { lineno })?;

        res.push(RawVoteRecord {
            position: position.to_string(),
            candidate: candidate.to_string(),
            votes: VoteValue::Text(votes.to_string()),
        });
    }
    Ok(res)
}
