use clap::Parser;

/// This is a tabulation program for student council election results.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The raw vote count records to aggregate.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// (default json) The type of the input: json, csv or xlsx. See the
    /// documentation for the expected layout of each format.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, optional) The scope configuration: the school-wide slate and the
    /// program to college table for board member races. Without it, board member
    /// races cannot be resolved and will be dropped.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the results summary will be written
    /// in JSON format to the given location instead of the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, sctally will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    /// The first worksheet is used if not specified.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
