use std::io::Write;
use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches};
use colored::Colorize;

use crate::command::Command;
use crate::commands::files::{expand_patterns, iterate_over};
use crate::commands::{
    warn, APP_NAME, APP_VERSION, FILES, HELP, SUCCESS_STATUS_CODE, USAGE_STATUS_CODE, VERBOSE,
};
use crate::errors::Result;
use crate::report::{parse_test_suite, MergedReport};
use crate::utils::writer::Writer;

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;

const ABOUT: &str = r#"Merges multiple JUnit XML result files into a single report.
Counters (tests, failures, errors, skipped, time) are summed and every test case
is copied over in file order. The merged document is written to stdout."#;
const AFTER_HELP: &str = "Example: junit-merge results1.xml 'reports/*.xml' > merged.xml";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct MergeOptions {
    pub verbose: bool,
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Merge {}

#[allow(clippy::new_without_default)]
impl Merge {
    pub fn new() -> Self {
        Merge {}
    }
}

impl Command for Merge {
    fn name(&self) -> &'static str {
        APP_NAME
    }

    fn command(&self) -> clap::Command {
        clap::Command::new(APP_NAME)
            .version(APP_VERSION)
            .about(ABOUT)
            .after_help(AFTER_HELP)
            .disable_help_flag(true)
            .arg(
                Arg::new(FILES)
                    .help("JUnit XML files or glob patterns to merge")
                    .value_name("FILE")
                    .num_args(1..)
                    .action(ArgAction::Append)
                    .required(false),
            )
            .arg(
                Arg::new(HELP.0)
                    .long(HELP.0)
                    .short(HELP.1)
                    .action(ArgAction::SetTrue)
                    .help("Print usage"),
            )
            .arg(
                Arg::new(VERBOSE.0)
                    .long(VERBOSE.0)
                    .short(VERBOSE.1)
                    .action(ArgAction::SetTrue)
                    .help("Report what every input contributed on stderr"),
            )
    }

    fn execute(&self, app: &ArgMatches, writer: &mut Writer) -> Result<i32> {
        let patterns = app
            .get_many::<String>(FILES)
            .map(|values| values.collect::<Vec<_>>())
            .unwrap_or_default();

        if app.get_flag(HELP.0) || patterns.is_empty() {
            write!(writer, "{}", self.command().render_help())?;
            return Ok(USAGE_STATUS_CODE);
        }

        let options = MergeOptions {
            verbose: app.get_flag(VERBOSE.0),
        };

        let files = expand_patterns(&patterns, options.verbose, writer)?;
        if files.is_empty() {
            warn(writer, String::from("no input files matched"))?;
        }

        let merged = merge_reports(&files, &options, writer)?;
        merged.serialize(&mut *writer)?;
        writer.flush()?;

        Ok(SUCCESS_STATUS_CODE)
    }
}

/// Parses every file and folds the survivors into one report.
///
/// Files that cannot be read or are not well-formed are reported on the
/// error stream and left out. A counter attribute that is not a number
/// aborts the whole merge.
pub fn merge_reports(
    files: &[PathBuf],
    options: &MergeOptions,
    writer: &mut Writer,
) -> Result<MergedReport> {
    let mut merged = MergedReport::default();

    for (file, result) in iterate_over(files, |content, path| parse_test_suite(&content, path)) {
        match result {
            Ok(suite) => {
                if options.verbose {
                    writer.write_err(format!(
                        "merged {}: tests={} passed={} failures={} errors={} skipped={} time={} cases={}",
                        file.display().to_string().bold(),
                        suite.tests,
                        suite.passed(),
                        suite.failures,
                        suite.errors,
                        suite.skipped,
                        suite.time,
                        suite.test_cases.len()
                    ))?;
                }
                merged.add(suite);
            }
            Err(e) if e.is_recoverable() => warn(
                writer,
                format!("skipping {}: {e}", file.display().to_string().bold()),
            )?,
            Err(e) => return Err(e),
        }
    }

    Ok(merged)
}
