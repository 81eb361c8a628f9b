//! Integration tests for the record model and the line format.

mod common;

use common::{create_iso_post, ISO_POST_LINES};
use marcline::line_format::{self, LineFormatOptions};
use marcline::{EscapeMode, Field, MarcError, Record, RecoveryMode, Subfield};

#[test]
fn test_iso_post_to_string() {
    let record = create_iso_post();
    assert_eq!(record.to_string(), ISO_POST_LINES);
}

#[test]
fn test_iso_post_parse_round_trip() {
    let original = create_iso_post();
    let mut parsed: Record = ISO_POST_LINES.parse().unwrap();
    parsed.implementation_codes = original.implementation_codes.clone();
    parsed.record_status = original.record_status.clone();

    assert_eq!(parsed, original);
    assert_eq!(parsed.to_string(), ISO_POST_LINES);
}

#[test]
fn test_iso_post_sizes() {
    let record = create_iso_post();
    assert_eq!(record.size(), 30);
    assert!(!record.is_empty());
    assert_eq!(record.count("700"), 8);
    assert_eq!(record.count("795"), 2);
    assert_eq!(record.count("999"), 0);

    let empty = Record::new();
    assert_eq!(empty.size(), 0);
    assert!(empty.is_empty());
}

#[test]
fn test_clone_is_equal_and_independent() {
    let record = create_iso_post();
    let mut copy = record.clone();
    assert_eq!(copy, record);

    copy.field_named_mut("245")
        .unwrap()
        .subfield_named_mut("a")
        .unwrap()
        .unwrap()
        .value = "Changed".to_string();
    assert_ne!(copy, record);
    assert_eq!(
        record.field_named("245").unwrap().subfield_named("a").unwrap().unwrap().value,
        "Something's goin' on"
    );
}

#[test]
fn test_field_occurrences() {
    let record = create_iso_post();
    let third = record.field_occurrence("700", 2).unwrap();
    assert_eq!(third.subfield_named("a").unwrap().unwrap().value, "Harrell");
    assert!(record.field_occurrence("700", 8).is_none());

    let missing = record.field_occurrence_or_empty("700", 8);
    assert_eq!(missing.name(), "");
    assert!(!missing.is_control_field());
}

#[test]
fn test_remove_fields() {
    let mut record = create_iso_post();
    let removed = record.remove("245").unwrap();
    assert_eq!(removed.name(), "245");
    assert_eq!(record.size(), 29);

    assert_eq!(record.remove_all("700"), 8);
    assert_eq!(record.size(), 21);
    assert_eq!(record.count("700"), 0);

    let second = record.remove_occurrence("795", 1).unwrap();
    assert_eq!(second.subfield_named("å").unwrap().unwrap().value, "99");
    assert_eq!(record.count("795"), 1);
}

#[test]
fn test_append_copies_field() {
    let mut record = Record::new();
    let mut field = Field::builder("245", "00").subfield("a", "Title").build();
    record.append(&field);
    field.append_value("b", "Subtitle").unwrap();

    assert_eq!(record.field(0).unwrap().count().unwrap(), 1);
    assert_eq!(field.count().unwrap(), 2);
}

#[test]
fn test_data_field_becomes_control_field() {
    let mut field = Field::new("001", "");
    field.set_value("12345678").unwrap();
    assert!(field.is_control_field());
    assert_eq!(field.value().unwrap(), "12345678");
    assert!(matches!(field.subfields(), Err(MarcError::StateViolation(_))));
    assert!(matches!(
        field.append_value("a", "x"),
        Err(MarcError::StateViolation(_))
    ));

    let mut data = Field::builder("245", "00").subfield("a", "Title").build();
    assert!(matches!(
        data.set_value("value"),
        Err(MarcError::StateViolation(_))
    ));
}

#[test]
fn test_control_field_renders_name_and_value() {
    let mut record = Record::new();
    record.append(Field::control("001", "12345678"));
    assert_eq!(record.to_string(), "001 12345678\n");
}

#[test]
fn test_parse_continuation_lines() {
    let text = "245 00 *a Something's goin' on *e Cliff Richard with\n    Steve Mandile\n";
    let record = line_format::parse(text).unwrap();
    let field = record.field(0).unwrap();
    assert_eq!(
        field.subfield_named("e").unwrap().unwrap().value,
        "Cliff Richard withSteve Mandile"
    );
}

#[test]
fn test_parse_skips_blank_lines() {
    let record: Record = "\n001 00 *a 1\n\n   \n002 00 *a 2\n".parse().unwrap();
    assert_eq!(record.size(), 2);
}

#[test]
fn test_parse_rejects_malformed_headers() {
    for text in ["100", "100 7", "100  7", "100 79 *", "100 00 *aa*bb\n200 10"] {
        let result: Result<Record, _> = text.parse();
        assert!(
            matches!(result, Err(MarcError::ParseError { .. })),
            "{text:?} should not parse"
        );
    }
}

#[test]
fn test_parse_escaped_markers() {
    let record: Record = "245 00 *a mail@@example.org *b 5 @* stars\n".parse().unwrap();
    let field = record.field(0).unwrap();
    assert_eq!(field.subfield(0).unwrap().unwrap().value, "mail@example.org");
    assert_eq!(field.subfield(1).unwrap().unwrap().value, "5 * stars");
    assert_eq!(
        record.to_string(),
        "245 00 *a mail@@example.org *b 5 @* stars \n"
    );
}

#[test]
fn test_values_with_edge_spaces_are_stable() {
    let mut record = Record::new();
    record.append(
        Field::builder("245", "00")
            .subfield("a", "x ")
            .subfield("b", "y")
            .build(),
    );
    record.append(
        Field::builder("300", "00")
            .subfield("a", "  1 bd.  ")
            .build(),
    );

    let once = record.to_string();
    assert_eq!(once, "245 00 *a x  *b y \n300 00 *a   1 bd.   \n");
    let parsed: Record = once.parse().unwrap();
    assert_eq!(parsed, record);
    assert_eq!(parsed.to_string(), once);
}

#[test]
fn test_first_occurrence_escaping() {
    let mut record = Record::new();
    record.append(
        Field::builder("245", "00")
            .subfield("a", "a@b@c*d*e")
            .build(),
    );
    let options = LineFormatOptions::default().with_escape(EscapeMode::FirstOccurrence);
    assert_eq!(
        line_format::to_line_format(&record, &options),
        "245 00 *a a@@b@c@*d*e \n"
    );
}

#[test]
fn test_from_line_format_keeps_header() {
    let mut record = create_iso_post();
    record
        .from_line_format("100 00 *a Marvin *h Hank\n")
        .unwrap();
    assert_eq!(record.size(), 1);
    assert_eq!(record.implementation_codes, "sse ");
    assert_eq!(record.record_status, "n");
}

#[test]
fn test_lenient_parse_reports_skipped_fields() {
    let text = "001 00 *a 1\nbroken line\n  continued\n245 00 *a Title\n";
    let options = LineFormatOptions::default().with_recovery_mode(RecoveryMode::Lenient);
    let (record, context) = line_format::parse_with_options(text, &options).unwrap();

    assert_eq!(record.size(), 2);
    assert!(context.has_errors);
    assert_eq!(context.recovery_messages.len(), 1);
    assert!(context.recovery_messages[0].contains("line 2"));
}

#[test]
fn test_subfield_display() {
    assert_eq!(Subfield::new("a", "value").to_string(), "*a value");
    assert_eq!(Subfield::new("0", "").to_string(), "*0");
}
