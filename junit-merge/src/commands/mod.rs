pub(crate) mod files;
pub mod merge;

use colored::Colorize;

use crate::utils::writer::Writer;

//
// Constants
//
// Application metadata
pub const APP_NAME: &str = "junit-merge";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
// Arguments
pub const FILES: &str = "files";
pub const HELP: (&str, char) = ("help", 'h');
pub const VERBOSE: (&str, char) = ("verbose", 'v');

pub const SUCCESS_STATUS_CODE: i32 = 0;
pub const USAGE_STATUS_CODE: i32 = 2;
pub const INTERNAL_FAILURE_STATUS_CODE: i32 = -1;

pub(crate) fn warn(writer: &mut Writer, message: String) -> std::io::Result<()> {
    writer.write_err(format!("{} {message}", "WARNING".yellow()))
}
