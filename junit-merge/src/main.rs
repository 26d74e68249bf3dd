use std::process::exit;

use junit_merge::command::Command;
use junit_merge::commands::merge::Merge;
use junit_merge::commands::INTERNAL_FAILURE_STATUS_CODE;
use junit_merge::utils::writer::Writer;

fn main() {
    let command = Merge::new();
    // usage errors are reported by clap, which exits with status 2
    let app = command.command().get_matches();
    let mut writer = Writer::default();

    match command.execute(&app, &mut writer) {
        Err(e) => {
            writer
                .write_err(format!("Error occurred {e}"))
                .expect("failed to write to stderr");

            exit(INTERNAL_FAILURE_STATUS_CODE);
        }
        Ok(code) => exit(code),
    }
}
