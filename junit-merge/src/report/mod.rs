pub mod parser;
pub mod serializer;

use std::path::PathBuf;

use quick_xml::events::Event;

pub use parser::parse_test_suite;

pub(crate) const TAG_TEST_SUITE: &[u8] = b"testsuite";
pub(crate) const TAG_PROPERTIES: &[u8] = b"properties";

pub(crate) const ATTR_TESTS: &str = "tests";
pub(crate) const ATTR_FAILURES: &str = "failures";
pub(crate) const ATTR_ERRORS: &str = "errors";
pub(crate) const ATTR_SKIPPED: &str = "skipped";
pub(crate) const ATTR_TIME: &str = "time";

/// One child element of a `testsuite`, kept as the raw event stream it was
/// read from so it can be written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    events: Vec<Event<'static>>,
}

impl TestCase {
    pub(crate) fn new(events: Vec<Event<'static>>) -> Self {
        TestCase { events }
    }

    pub(crate) fn events(&self) -> &[Event<'static>] {
        &self.events
    }

    /// Value of the `name` attribute of the case element, if any.
    pub fn name(&self) -> Option<String> {
        let start = match self.events.first() {
            Some(Event::Start(start)) | Some(Event::Empty(start)) => start,
            _ => return None,
        };

        start
            .try_get_attribute("name")
            .ok()
            .flatten()
            .and_then(|attr| attr.unescape_value().ok().map(|value| value.into_owned()))
    }
}

/// A single parsed input document.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSuiteReport {
    pub source: PathBuf,
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub time: f64,
    pub test_cases: Vec<TestCase>,
}

impl TestSuiteReport {
    pub fn passed(&self) -> u64 {
        self.tests
            .saturating_sub(self.failures)
            .saturating_sub(self.errors)
            .saturating_sub(self.skipped)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedReport {
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub time: f64,
    pub test_cases: Vec<TestCase>,
}

impl MergedReport {
    pub fn add(&mut self, suite: TestSuiteReport) {
        self.tests = self.tests.saturating_add(suite.tests);
        self.failures = self.failures.saturating_add(suite.failures);
        self.errors = self.errors.saturating_add(suite.errors);
        self.skipped = self.skipped.saturating_add(suite.skipped);
        self.time += suite.time;
        self.test_cases.extend(suite.test_cases);
    }
}

impl FromIterator<TestSuiteReport> for MergedReport {
    fn from_iter<I: IntoIterator<Item = TestSuiteReport>>(iter: I) -> Self {
        iter.into_iter().fold(MergedReport::default(), |mut merged, suite| {
            merged.add(suite);
            merged
        })
    }
}
