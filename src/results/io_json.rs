// Reader for the JSON export of the vote-recording subsystem.

use log::debug;

use snafu::prelude::*;

use std::fs;

use serde_json::Value as JSValue;

use council_tally::{RawVoteRecord, VoteValue};

use crate::results::{
    OpeningJsonSnafu, ParsingJsonSnafu, RecordsJsonShapeSnafu, ResultsResult,
};

pub fn read_json_records(path: String) -> ResultsResult<Vec<RawVoteRecord>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    records_from_json(&js)
}

/// Extracts the records from a parsed document: either a bare array of
/// records or an object with a `voteCounts` array.
pub fn records_from_json(js: &JSValue) -> ResultsResult<Vec<RawVoteRecord>> {
    let rows = match js {
        JSValue::Array(rows) => rows,
        JSValue::Object(obj) => obj
            .get("voteCounts")
            .and_then(|v| v.as_array())
            .context(RecordsJsonShapeSnafu {})?,
        _ => return RecordsJsonShapeSnafu {}.fail(),
    };

    let mut res: Vec<RawVoteRecord> = Vec::new();
    for row in rows.iter() {
        debug!("records_from_json: row: {:?}", row);
        let position = row
            .get("position")
            .and_then(|v| v.as_str())
            .context(RecordsJsonShapeSnafu {})?;
        let candidate = row
            .get("candidate")
            .and_then(|v| v.as_str())
            .context(RecordsJsonShapeSnafu {})?;
        res.push(RawVoteRecord {
            position: position.to_string(),
            candidate: candidate.to_string(),
            votes: read_vote_value(row.get("votes")),
        });
    }
    Ok(res)
}

// The count field may be a number or numeric text. Anything else is kept as
// text so that the engine counts it as a malformed drop instead of failing
// the whole run.
fn read_vote_value(x: Option<&JSValue>) -> VoteValue {
    match x {
        Some(JSValue::Number(n)) => match n.as_u64() {
            Some(c) => VoteValue::Count(c),
            // Negative or fractional counts are data errors.
            None => VoteValue::Text(n.to_string()),
        },
        Some(JSValue::String(s)) => VoteValue::Text(s.clone()),
        Some(other) => VoteValue::Text(other.to_string()),
        None => VoteValue::Text(String::new()),
    }
}
