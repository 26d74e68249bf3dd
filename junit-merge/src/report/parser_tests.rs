use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::report::MergedReport;

fn parse(xml: &str) -> Result<TestSuiteReport> {
    parse_test_suite(xml, Path::new("report.xml"))
}

fn render(suite: TestSuiteReport) -> String {
    let merged: MergedReport = std::iter::once(suite).collect();
    let mut out = vec![];
    merged.serialize(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn reads_counters_and_cases() {
    let suite = parse(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="s3" tests="3" failures="1" errors="0" skipped="1" time="1.5">
    <testcase name="put"/>
    <testcase name="get"><failure message="404"/></testcase>
    <testcase name="delete"><skipped/></testcase>
</testsuite>
"#,
    )
    .unwrap();

    assert_eq!(3, suite.tests);
    assert_eq!(1, suite.failures);
    assert_eq!(0, suite.errors);
    assert_eq!(1, suite.skipped);
    assert_eq!(1.5, suite.time);
    assert_eq!(Path::new("report.xml"), suite.source);
    assert_eq!(
        vec!["put", "get", "delete"],
        suite
            .test_cases
            .iter()
            .filter_map(|case| case.name())
            .collect::<Vec<_>>()
    );
}

#[test]
fn missing_counters_default_to_zero() {
    let suite = parse("<testsuite><testcase/></testsuite>").unwrap();

    assert_eq!(0, suite.tests);
    assert_eq!(0, suite.failures);
    assert_eq!(0, suite.errors);
    assert_eq!(0, suite.skipped);
    assert_eq!(0.0, suite.time);
    assert_eq!(1, suite.test_cases.len());
}

#[test]
fn counters_tolerate_surrounding_whitespace() {
    let suite = parse(r#"<testsuite tests=" 7 " time=" 0.5"/>"#).unwrap();

    assert_eq!(7, suite.tests);
    assert_eq!(0.5, suite.time);
}

#[rstest]
#[case(r#"<testsuite tests="seven"/>"#, "tests", "seven")]
#[case(r#"<testsuite failures="1.5"/>"#, "failures", "1.5")]
#[case(r#"<testsuite errors=""/>"#, "errors", "")]
#[case(r#"<testsuite skipped="-1"/>"#, "skipped", "-1")]
#[case(r#"<testsuite time="fast"/>"#, "time", "fast")]
#[case(r#"<testsuite time="NaN"/>"#, "time", "NaN")]
#[case(r#"<testsuite time="inf"/>"#, "time", "inf")]
#[case(r#"<testsuite time="-3.5"/>"#, "time", "-3.5")]
fn non_numeric_counters_are_data_errors(
    #[case] xml: &str,
    #[case] expected_attribute: &str,
    #[case] expected_value: &str,
) {
    match parse(xml) {
        Err(Error::InvalidCounter {
            file,
            attribute,
            value,
        }) => {
            assert_eq!("report.xml", file);
            assert_eq!(expected_attribute, attribute);
            assert_eq!(expected_value, value);
        }
        other => panic!("expected an invalid counter error, got {other:?}"),
    }
}

#[rstest]
#[case::unclosed_root(r#"<testsuite tests="1"><testcase>"#)]
#[case::mismatched_tags("<testsuite><testcase></failure></testsuite>")]
#[case::wrong_root("<testsuites><testsuite/></testsuites>")]
#[case::two_roots("<testsuite/><testsuite/>")]
#[case::text_outside_root("<testsuite/>trailing")]
#[case::empty_document("")]
#[case::not_xml("this is not a report")]
#[case::broken_attribute(r#"<testsuite tests="1/>"#)]
#[case::bare_ampersand_in_text(
    "<testsuite><testcase><system-out>a & b</system-out></testcase></testsuite>"
)]
#[case::unknown_entity_in_text(
    "<testsuite><testcase><system-out>&bogus;</system-out></testcase></testsuite>"
)]
#[case::unquoted_attribute("<testsuite><testcase name=a/></testsuite>")]
#[case::duplicated_attribute(r#"<testsuite><testcase name="a" name="b"/></testsuite>"#)]
#[case::angle_bracket_in_attribute(r#"<testsuite><testcase name="a<b"/></testsuite>"#)]
#[case::unknown_entity_in_attribute(r#"<testsuite><testcase name="&bogus;"/></testsuite>"#)]
#[case::broken_attribute_inside_properties(
    "<testsuite><testcase><properties><property name=x/></properties></testcase></testsuite>"
)]
fn malformed_documents_are_recoverable(#[case] xml: &str) {
    match parse(xml) {
        Err(e) => assert!(e.is_recoverable(), "{e:?} should be recoverable"),
        Ok(suite) => panic!("expected a parse failure, got {suite:?}"),
    }
}

#[test]
fn properties_inside_cases_are_stripped() {
    let suite = parse(
        r#"<testsuite tests="1">
    <testcase name="b1" classname="Bucket">
        <properties>
            <property name="bucket" value="test-1"/>
        </properties>
        <system-out>created</system-out>
    </testcase>
</testsuite>"#,
    )
    .unwrap();

    assert_eq!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite tests="1" errors="0" skipped="0" failures="0" time="0.0">
    <testcase name="b1" classname="Bucket">
        <system-out>created</system-out>
    </testcase>
</testsuite>
"#,
        render(suite)
    );
}

#[test]
fn empty_properties_element_is_stripped() {
    let suite = parse(r#"<testsuite><testcase name="x"><properties/></testcase></testsuite>"#).unwrap();

    assert_eq!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite tests="0" errors="0" skipped="0" failures="0" time="0.0">
    <testcase name="x"></testcase>
</testsuite>
"#,
        render(suite)
    );
}

#[test]
fn suite_level_properties_are_not_treated_as_cases() {
    let suite = parse(
        r#"<testsuite tests="1">
  <properties>
    <property name="java.specification.version" value="17"/>
  </properties>
  <testcase name="only"/>
</testsuite>"#,
    )
    .unwrap();

    assert_eq!(1, suite.test_cases.len());
    assert_eq!(Some(String::from("only")), suite.test_cases[0].name());
}

#[test]
fn deeper_properties_elements_are_kept() {
    let suite = parse(
        r#"<testsuite><testcase><failure><properties>kept</properties></failure></testcase></testsuite>"#,
    )
    .unwrap();

    assert!(render(suite).contains("<failure><properties>kept</properties></failure>"));
}

#[test]
fn text_and_escapes_are_preserved() {
    let suite = parse(
        "<testsuite>\n<testcase name=\"&lt;lt&gt;\"><!-- note --><system-err>a &amp; b\n  c</system-err></testcase>\n</testsuite>",
    )
    .unwrap();

    assert!(render(suite).contains(
        "<testcase name=\"&lt;lt&gt;\"><!-- note --><system-err>a &amp; b\n  c</system-err></testcase>"
    ));
}

#[test]
fn character_references_are_accepted() {
    let suite = parse(
        r#"<testsuite><testcase name="&#x41;&quot;"><system-out>&#65; &gt; &apos;</system-out></testcase></testsuite>"#,
    )
    .unwrap();

    assert!(render(suite)
        .contains(r#"<testcase name="&#x41;&quot;"><system-out>&#65; &gt; &apos;</system-out>"#));
}

#[test]
fn zero_time_is_accepted() {
    let suite = parse(r#"<testsuite time="0"/>"#).unwrap();
    assert_eq!(0.0, suite.time);
}

#[test]
fn byte_order_mark_is_ignored() {
    let suite = parse("\u{feff}<testsuite tests=\"2\"/>").unwrap();
    assert_eq!(2, suite.tests);
}
