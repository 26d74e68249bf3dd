use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::errors::{Error, Result};
use crate::report::{
    TestCase, TestSuiteReport, ATTR_ERRORS, ATTR_FAILURES, ATTR_SKIPPED, ATTR_TESTS, ATTR_TIME,
    TAG_PROPERTIES, TAG_TEST_SUITE,
};

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;

/// Parses one JUnit document rooted at a `testsuite` element.
///
/// Missing counters default to zero. A counter that is present but not a
/// number yields [`Error::InvalidCounter`]; every other failure means the
/// document is malformed and is reported as a recoverable error.
pub fn parse_test_suite(content: &str, source: &Path) -> Result<TestSuiteReport> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.check_end_names(true);

    let mut parser = SuiteParser::new(source);
    loop {
        let event = reader.read_event().map_err(|e| {
            Error::ParseError(format!(
                "{}: {e} at position {}",
                source.display(),
                reader.buffer_position()
            ))
        })?;
        if !parser.match_event(event)? {
            break;
        }
    }
    parser.finish()
}

struct SuiteParser<'p> {
    source: &'p Path,
    depth: usize,
    suite: Option<TestSuiteReport>,
    closed: bool,
    case: Vec<Event<'static>>,
    // depth at which a stripped `properties` element was opened
    stripping: Option<usize>,
    pending_whitespace: Option<Event<'static>>,
}

impl<'p> SuiteParser<'p> {
    fn new(source: &'p Path) -> Self {
        SuiteParser {
            source,
            depth: 0,
            suite: None,
            closed: false,
            case: vec![],
            stripping: None,
            pending_whitespace: None,
        }
    }

    fn match_event(&mut self, event: Event<'_>) -> Result<bool> {
        match event {
            Event::Eof => return Ok(false),
            Event::Start(e) => {
                self.check_attributes(&e)?;
                self.open_element(e)?
            }
            Event::Empty(e) => {
                self.check_attributes(&e)?;
                self.empty_element(e)?
            }
            Event::End(e) => {
                self.depth = match self.depth.checked_sub(1) {
                    Some(depth) => depth,
                    None => return Err(self.malformed("closing tag without a matching start")),
                };
                if self.depth == 0 {
                    self.closed = true;
                } else if self.stripping.is_some() {
                    if self.stripping == Some(self.depth) {
                        self.stripping = None;
                    }
                } else {
                    self.push(Event::End(e.into_owned()));
                    if self.depth == 1 {
                        self.close_case();
                    }
                }
            }
            Event::Text(t) => self.text(t)?,
            event @ (Event::CData(_) | Event::Comment(_) | Event::PI(_)) => {
                if self.depth >= 2 && self.stripping.is_none() {
                    self.push(event.into_owned());
                }
            }
            Event::Decl(_) | Event::DocType(_) => {}
        }

        Ok(true)
    }

    fn open_element(&mut self, e: BytesStart<'_>) -> Result<()> {
        match self.depth {
            0 => self.open_suite(&e)?,
            _ if self.stripping.is_some() => {}
            depth if depth <= 2 && is_properties(&e) => {
                self.pending_whitespace = None;
                self.stripping = Some(depth);
            }
            _ => self.push(Event::Start(e.into_owned())),
        }
        self.depth += 1;
        Ok(())
    }

    fn empty_element(&mut self, e: BytesStart<'_>) -> Result<()> {
        match self.depth {
            0 => {
                self.open_suite(&e)?;
                self.closed = true;
            }
            _ if self.stripping.is_some() => {}
            depth if depth <= 2 && is_properties(&e) => self.pending_whitespace = None,
            1 => {
                self.case.push(Event::Empty(e.into_owned()));
                self.close_case();
            }
            _ => self.push(Event::Empty(e.into_owned())),
        }
        Ok(())
    }

    fn text(&mut self, t: BytesText<'_>) -> Result<()> {
        let whitespace = t.iter().all(u8::is_ascii_whitespace);
        if !whitespace {
            t.unescape()
                .map_err(|err| self.malformed(&format!("invalid text content: {err}")))?;
        }
        match self.depth {
            0 if !whitespace => Err(self.malformed("text outside of the root element")),
            // layout between cases and stray suite-level text is not carried over
            0 | 1 => Ok(()),
            _ if self.stripping.is_some() => Ok(()),
            _ if whitespace => {
                self.flush_whitespace();
                self.pending_whitespace = Some(Event::Text(t.into_owned()));
                Ok(())
            }
            _ => {
                self.push(Event::Text(t.into_owned()));
                Ok(())
            }
        }
    }

    fn open_suite(&mut self, e: &BytesStart<'_>) -> Result<()> {
        if self.suite.is_some() || self.closed {
            return Err(self.malformed("more than one root element"));
        }

        if e.name().as_ref() != TAG_TEST_SUITE {
            return Err(self.malformed(&format!(
                "expected root element `testsuite`, found `{}`",
                String::from_utf8_lossy(e.name().as_ref())
            )));
        }

        self.suite = Some(TestSuiteReport {
            source: self.source.to_path_buf(),
            tests: self.counter(e, ATTR_TESTS)?,
            failures: self.counter(e, ATTR_FAILURES)?,
            errors: self.counter(e, ATTR_ERRORS)?,
            skipped: self.counter(e, ATTR_SKIPPED)?,
            time: self.checked_counter(e, ATTR_TIME, |time: &f64| {
                time.is_finite() && *time >= 0.0
            })?,
            test_cases: vec![],
        });

        Ok(())
    }

    fn counter<T>(&self, e: &BytesStart<'_>, attribute: &'static str) -> Result<T>
    where
        T: FromStr + Default,
    {
        self.checked_counter(e, attribute, |_| true)
    }

    fn checked_counter<T, F>(
        &self,
        e: &BytesStart<'_>,
        attribute: &'static str,
        accept: F,
    ) -> Result<T>
    where
        T: FromStr + Default,
        F: Fn(&T) -> bool,
    {
        let value = match e.try_get_attribute(attribute)? {
            Some(attr) => attr.unescape_value()?,
            None => return Ok(T::default()),
        };

        match value.trim().parse::<T>() {
            Ok(parsed) if accept(&parsed) => Ok(parsed),
            _ => Err(Error::InvalidCounter {
                file: self.source.display().to_string(),
                attribute,
                value: value.into_owned(),
            }),
        }
    }

    // captured events are written back verbatim and the reader checks neither
    // attribute syntax nor entity references
    fn check_attributes(&self, e: &BytesStart<'_>) -> Result<()> {
        let mut attributes = e.attributes();
        attributes.with_checks(true);
        for attr in attributes {
            let attr = attr.map_err(|err| self.malformed(&format!("invalid attribute: {err}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if attr.value.contains(&b'<') {
                return Err(self.malformed(&format!("`<` in value of attribute `{key}`")));
            }
            attr.unescape_value().map_err(|err| {
                self.malformed(&format!("invalid value of attribute `{key}`: {err}"))
            })?;
        }
        Ok(())
    }

    fn push(&mut self, event: Event<'static>) {
        self.flush_whitespace();
        self.case.push(event);
    }

    fn flush_whitespace(&mut self) {
        if let Some(whitespace) = self.pending_whitespace.take() {
            self.case.push(whitespace);
        }
    }

    fn close_case(&mut self) {
        let events = std::mem::take(&mut self.case);
        if let Some(suite) = self.suite.as_mut() {
            suite.test_cases.push(TestCase::new(events));
        }
    }

    fn finish(self) -> Result<TestSuiteReport> {
        if self.depth != 0 {
            return Err(self.malformed(&format!(
                "unexpected end of document with {} unclosed element(s)",
                self.depth
            )));
        }

        match self.suite {
            Some(suite) => Ok(suite),
            None => Err(Error::ParseError(format!(
                "{}: document has no root element",
                self.source.display()
            ))),
        }
    }

    fn malformed(&self, reason: &str) -> Error {
        Error::ParseError(format!("{}: {reason}", self.source.display()))
    }
}

fn is_properties(e: &BytesStart<'_>) -> bool {
    e.name().as_ref() == TAG_PROPERTIES
}
