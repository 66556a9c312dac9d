use clap::Parser;
use log::warn;
use snafu::ErrorCompat;

mod args;
mod results;

use crate::args::Args;

fn main() {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Err(e) = results::run_aggregation(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        // The output contract on failure: an explicit failure envelope and
        // no partial results.
        println!("{}", results::failure_summary_js());
        std::process::exit(1);
    }
}
