use log::{info, warn};

use council_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::results::config_reader::*;

pub mod config_reader;
mod io_csv;
mod io_excel;
mod io_json;

#[derive(Debug, Snafu)]
pub enum ResultsError {
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel workbook has no readable worksheet"))]
    EmptyExcel {},
    #[snafu(display("The Excel workbook has no worksheet named {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading a CSV record"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error reading file"))]
    OpeningJson { source: std::io::Error },
    #[snafu(display("Error parsing JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Unexpected JSON shape for the vote count records"))]
    RecordsJsonShape {},
    #[snafu(display("Invalid scope configuration"))]
    InvalidScope { source: TallyErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ResultsResult<T> = Result<T, ResultsError>;

fn read_records(args: &Args) -> ResultsResult<Vec<RawVoteRecord>> {
    let input_type = args
        .input_type
        .clone()
        .unwrap_or_else(|| "json".to_string());
    info!(
        "Attempting to read vote count records from {:?} as {}",
        args.input, input_type
    );
    match input_type.as_str() {
        "json" => io_json::read_json_records(args.input.clone()),
        "csv" => io_csv::read_csv_records(args.input.clone()),
        "xlsx" => {
            io_excel::read_excel_records(args.input.clone(), args.excel_worksheet_name.clone())
        }
        x => whatever!("Input type not implemented {:?}", x),
    }
}

fn position_result_to_json(pr: &PositionResult) -> JSValue {
    let candidates: Vec<JSValue> = pr
        .candidates
        .iter()
        .map(|c| json!({"name": c.name, "votes": c.votes, "percentage": c.percentage}))
        .collect();
    json!({
        "candidates": candidates,
        "abstain": { "votes": pr.abstain.votes, "percentage": pr.abstain.percentage },
        "totalVotes": pr.total_votes
    })
}

fn result_set_to_json(results: &ResultSet) -> JSValue {
    let mut ssc: JSMap<String, JSValue> = JSMap::new();
    for (position, pr) in results.all_ssc().iter() {
        ssc.insert(position.clone(), position_result_to_json(pr));
    }

    let mut lsc: JSMap<String, JSValue> = JSMap::new();
    for (college, positions) in results.lsc().iter() {
        let mut by_position: JSMap<String, JSValue> = JSMap::new();
        for (position, pr) in positions.iter() {
            by_position.insert(position.clone(), position_result_to_json(pr));
        }
        lsc.insert(college.clone(), JSValue::Object(by_position));
    }

    json!({ "ssc": ssc, "lsc": lsc })
}

fn build_summary_js(outcome: &AggregationResult) -> JSValue {
    json!({
        "success": true,
        "droppedRecords": outcome.dropped.total(),
        "results": result_set_to_json(&outcome.results)
    })
}

/// The envelope emitted when the run fails. No partial results: percentages
/// over an incomplete snapshot would be misleading.
pub fn failure_summary_js() -> JSValue {
    json!({ "success": false })
}

fn read_summary(path: String) -> ResultsResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

pub fn run_aggregation(args: &Args) -> ResultsResult<()> {
    let scope = match args.config.clone() {
        Some(config_path) => {
            let config = read_scope_config(config_path)?;
            validate_scope(&config)?
        }
        // Without the artifact: default school-wide slate, empty program
        // table. Board member races will not resolve.
        None => ScopeConfig::with_programs(ProgramTable::empty()),
    };

    let records = read_records(args)?;
    info!("run_aggregation: read {:?} records", records.len());

    let outcome = aggregate_results(&records, &scope);
    if outcome.dropped.total() > 0 {
        warn!(
            "run_aggregation: {:?} records were dropped ({:?} unresolvable, {:?} malformed)",
            outcome.dropped.total(),
            outcome.dropped.unresolvable,
            outcome.dropped.malformed
        );
    }

    let result_js = build_summary_js(&outcome);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match args.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty_js_stats),
        Some(out_path) => {
            fs::write(out_path, pretty_js_stats.as_str()).context(OpeningJsonSnafu {})?;
            info!("run_aggregation: wrote the summary to {:?}", out_path);
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = args.reference.clone() {
        let summary_ref = read_summary(reference_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}
