// Reader for vote counts exported as an Excel workbook.

use log::debug;

use snafu::prelude::*;

use calamine::{open_workbook, Reader, Xlsx};

use council_tally::{RawVoteRecord, VoteValue};

use crate::results::{
    EmptyExcelSnafu, MissingWorksheetSnafu, OpeningExcelSnafu, ResultsResult,
};

pub fn read_excel_records(
    path: String,
    worksheet: Option<String>,
) -> ResultsResult<Vec<RawVoteRecord>> {
    let p = path.clone();
    let mut workbook: Xlsx<_> =
        open_workbook(p).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name.as_str())
            .context(MissingWorksheetSnafu { name: name.clone() })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {})?
            .context(OpeningExcelSnafu { path })?,
    };

    let mut iter = wrange.rows();
    // The first row carries the column headers: position, candidate, votes.
    let header = iter.next().context(EmptyExcelSnafu {})?;
    debug!("read_excel_records: header: {:?}", header);

    let mut res: Vec<RawVoteRecord> = Vec::new();
    for row in iter {
        debug!("read_excel_records: row: {:?}", row);
        if row.iter().all(|c| matches!(c, calamine::DataType::Empty)) {
            continue;
        }
        let position = read_cell_text(row.get(0))?;
        let candidate = read_cell_text(row.get(1))?;
        let votes = read_cell_count(row.get(2));
        res.push(RawVoteRecord {
            position,
            candidate,
            votes,
        });
    }
    Ok(res)
}

fn read_cell_text(cell: Option<&calamine::DataType>) -> ResultsResult<String> {
    match cell {
        Some(calamine::DataType::String(s)) => Ok(s.clone()),
        _ => whatever!("read_cell_text: could not understand cell {:?}", cell),
    }
}

// Counts come out of Excel as ints, floats or text.
fn read_cell_count(cell: Option<&calamine::DataType>) -> VoteValue {
    match cell {
        Some(calamine::DataType::Int(i)) if *i >= 0 => VoteValue::Count(*i as u64),
        Some(calamine::DataType::Float(f)) if *f >= 0.0 && f.fract() == 0.0 => {
            VoteValue::Count(*f as u64)
        }
        Some(calamine::DataType::String(s)) => VoteValue::Text(s.clone()),
        other => VoteValue::Text(format!("{:?}", other)),
    }
}
