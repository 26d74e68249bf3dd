use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::errors::Result;
use crate::report::{MergedReport, ATTR_ERRORS, ATTR_FAILURES, ATTR_SKIPPED, ATTR_TESTS, ATTR_TIME};

const TEST_SUITE: &str = "testsuite";
const CASE_INDENT: &str = "\n    ";

impl MergedReport {
    /// Writes the merged document, declaration included, to `writer`.
    ///
    /// Each case is placed on its own line; everything inside a case is
    /// written exactly as it was read.
    pub fn serialize(&self, writer: impl Write) -> Result<()> {
        let mut writer = quick_xml::Writer::new(writer);
        let decl = BytesDecl::new("1.0", Some("UTF-8"), None);

        writer.write_event(Event::Decl(decl))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

        let mut suite_tag = BytesStart::new(TEST_SUITE);
        suite_tag.extend_attributes([
            (ATTR_TESTS, self.tests.to_string().as_str()),
            (ATTR_ERRORS, self.errors.to_string().as_str()),
            (ATTR_SKIPPED, self.skipped.to_string().as_str()),
            (ATTR_FAILURES, self.failures.to_string().as_str()),
            (ATTR_TIME, format_time(self.time).as_str()),
        ]);
        writer.write_event(Event::Start(suite_tag))?;

        for case in &self.test_cases {
            writer.write_event(Event::Text(BytesText::from_escaped(CASE_INDENT)))?;
            for event in case.events() {
                writer.write_event(event)?;
            }
        }

        if !self.test_cases.is_empty() {
            writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
        }
        writer.write_event(Event::End(BytesEnd::new(TEST_SUITE)))?;
        writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

        Ok(())
    }
}

// Debug keeps the trailing `.0` on whole numbers: 2.0 rather than 2.
fn format_time(time: f64) -> String {
    format!("{time:?}")
}
