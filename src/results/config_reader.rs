use log::debug;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use std::fs;

use council_tally::{ProgramTable, ScopeConfig};

use crate::results::{InvalidScopeSnafu, OpeningJsonSnafu, ParsingJsonSnafu, ResultsResult};

/// One college with its ordered list of degree programs.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CollegePrograms {
    pub college: String,
    pub programs: Vec<String>,
}

/// The scope configuration artifact.
///
/// The program table mirrors the curricular structure of the institution
/// and is versioned with the election, never hard-coded in a deployment.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScopeFileConfig {
    #[serde(rename = "sscPositions")]
    pub ssc_positions: Option<Vec<String>>,
    pub colleges: Vec<CollegePrograms>,
}

pub fn read_scope_config(path: String) -> ResultsResult<ScopeFileConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let config: ScopeFileConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_scope_config: {:?}", config);
    Ok(config)
}

/// Checks the artifact and turns it into the engine's scope configuration.
pub fn validate_scope(config: &ScopeFileConfig) -> ResultsResult<ScopeConfig> {
    let pairs: Vec<(String, Vec<String>)> = config
        .colleges
        .iter()
        .map(|c| (c.college.clone(), c.programs.clone()))
        .collect();
    let programs = ProgramTable::new(&pairs).context(InvalidScopeSnafu {})?;
    let scope = match config.ssc_positions.clone() {
        Some(positions) => ScopeConfig::new(&positions, programs),
        None => ScopeConfig::with_programs(programs),
    };
    Ok(scope)
}
