//! Translation completeness check for CI.
//!
//! Compares every language under `ui/locales/` (or the directory given on
//! the command line) against the reference language and prints a
//! categorized report. Exit status: 0 when complete, 1 when any error-level
//! issue (missing key, missing or invalid file) was found, 2 when the tree
//! could not be read or the arguments are invalid.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ui::i18n::completeness;

const LOCALES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/locales");

#[derive(Parser, Debug)]
#[command(name = "i18n-check", about = "Report missing translations per language and namespace")]
struct Cli {
    /// Locale tree laid out as `<dir>/<language>/<namespace>.json`.
    #[arg(value_name = "DIR", default_value = LOCALES_DIR)]
    dir: PathBuf,
    /// Language every other locale is compared against.
    #[arg(long, value_name = "LANG", default_value = "en")]
    reference: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let report = completeness::read_locale_dir(&cli.dir)
        .and_then(|tree| completeness::check(&tree, &cli.reference));

    match report {
        Ok(report) => {
            print!("{}", report.render());
            if report.has_errors() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("i18n-check: {err}");
            ExitCode::from(2)
        }
    }
}
