// Copyright Amazon Web Services, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use junit_merge::command::Command;
use junit_merge::commands::merge::Merge;
use junit_merge::utils::writer::Writer;

#[non_exhaustive]
pub struct StatusCode;

#[allow(dead_code)]
impl StatusCode {
    pub const SUCCESS: i32 = 0;
    pub const INTERNAL_FAILURE: i32 = -1;
    pub const USAGE: i32 = 2;
}

pub fn read_from_resource_file(path: &str) -> String {
    let mut content = String::new();
    let mut reader = BufReader::new(File::open(get_full_path_for_resource_file(path)).unwrap());
    reader.read_to_string(&mut content).unwrap();

    content
}

pub fn get_full_path_for_resource_file(path: &str) -> String {
    let mut resource = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    resource.push(path);
    resource.display().to_string()
}

pub fn compare_write_buffer_with_file(
    expected_output_relative_file_path: &str,
    actual_output_writer: Writer,
) {
    let expected_output = read_from_resource_file(expected_output_relative_file_path);
    let actual_output = actual_output_writer.stripped().unwrap();
    pretty_assertions::assert_eq!(expected_output, actual_output)
}

pub trait CommandTestRunner {
    fn build_args(&self) -> Vec<String>;

    fn run(&self, writer: &mut Writer) -> i32 {
        let command = Merge::new();
        let args = self
            .build_args()
            .into_iter()
            .fold(vec![String::from(command.name())], |mut res, arg| {
                res.push(arg);
                res
            });

        match command.command().try_get_matches_from(args) {
            Ok(matches) => match command.execute(&matches, writer) {
                Err(e) => {
                    writer
                        .write_err(format!("Error occurred {e}"))
                        .expect("failed to write to stderr");

                    StatusCode::INTERNAL_FAILURE
                }
                Ok(code) => code,
            },
            Err(e) => {
                writer
                    .write_err(e.to_string())
                    .expect("failed to write to stderr");

                e.exit_code()
            }
        }
    }
}

#[macro_export]
macro_rules! assert_output_from_file_eq {
    ($expected_output_relative_file_path: expr, $actual_output_writer: expr) => {
        $crate::utils::compare_write_buffer_with_file(
            $expected_output_relative_file_path,
            $actual_output_writer,
        )
    };
}
