use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use colored::Colorize;
use encoding_rs::{Encoding, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::commands::warn;
use crate::errors::{Error, Result};
use crate::utils::writer::Writer;

#[cfg(test)]
#[path = "files_tests.rs"]
mod files_tests;

pub(crate) fn read_file_content(file: File) -> Result<String> {
    let mut file_content = vec![];
    let mut buf_reader = BufReader::new(file);
    buf_reader.read_to_end(&mut file_content)?;
    decode_content(&file_content)
}

/// Decodes a report to UTF-8 text. A byte order mark takes precedence over
/// the encoding named in the XML declaration; with neither, UTF-8 is assumed.
pub(crate) fn decode_content(bytes: &[u8]) -> Result<String> {
    let encoding = match Encoding::for_bom(bytes) {
        Some((encoding, _)) => encoding,
        None => declared_encoding(bytes)?.unwrap_or(UTF_8),
    };

    let (content, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(Error::ParseError(format!(
            "content is not valid {}",
            encoding.name()
        )));
    }
    Ok(content.into_owned())
}

fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = vec![];
    let decl = match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => decl,
        _ => return Ok(None),
    };

    match decl.encoding() {
        // a declared UTF-16 without a byte order mark is read as UTF-8
        Some(Ok(label)) => match Encoding::for_label(&label).map(Encoding::output_encoding) {
            Some(encoding) => Ok(Some(encoding)),
            None => Err(Error::ParseError(format!(
                "unknown encoding `{}`",
                String::from_utf8_lossy(&label)
            ))),
        },
        _ => Ok(None),
    }
}

/// Expands every pattern with glob matching, keeping the order in which the
/// patterns were given. A pattern that matches nothing contributes nothing.
pub(crate) fn expand_patterns<S: AsRef<str>>(
    patterns: &[S],
    verbose: bool,
    writer: &mut Writer,
) -> Result<Vec<PathBuf>> {
    let mut selected = Vec::with_capacity(patterns.len());

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warn(writer, format!("ignoring invalid pattern `{pattern}`: {e}"))?;
                continue;
            }
        };

        let before = selected.len();
        for entry in paths {
            match entry {
                Ok(path) => selected.push(path),
                Err(e) => warn(
                    writer,
                    format!("skipping {}: {}", e.path().display(), e.error()),
                )?,
            }
        }

        if verbose {
            writer.write_err(format!(
                "pattern {} matched {} file(s)",
                pattern.bold(),
                selected.len() - before
            ))?;
        }
    }

    Ok(selected)
}

#[derive(Debug)]
pub(crate) struct Iter<'i, T, C>
where
    C: Fn(String, &PathBuf) -> Result<T>,
{
    files: &'i [PathBuf],
    index: usize,
    converter: C,
}

impl<'i, T, C> Iterator for Iter<'i, T, C>
where
    C: Fn(String, &PathBuf) -> Result<T>,
{
    type Item = (&'i PathBuf, Result<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.files.get(self.index)?;
        self.index += 1;
        let content = File::open(next)
            .map_err(Error::from)
            .and_then(read_file_content);
        match content {
            Ok(content) => Some((next, (self.converter)(content, next))),
            Err(e) => Some((next, Err(e))),
        }
    }
}

/// Reads each file in turn and hands its content to `converter`, pairing
/// every result with the path it came from.
pub(crate) fn iterate_over<T, C>(files: &[PathBuf], converter: C) -> Iter<'_, T, C>
where
    C: Fn(String, &PathBuf) -> Result<T>,
{
    Iter {
        files,
        converter,
        index: 0,
    }
}
