// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod command;
pub mod commands;
pub mod errors;
pub mod report;
pub mod utils;

pub use crate::errors::{Error, Result};
pub use crate::report::{MergedReport, TestCase, TestSuiteReport};
