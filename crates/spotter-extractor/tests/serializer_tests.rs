//! Integration tests for spotter-extractor
//!
//! These tests drive the public serializer API over realistic annotated
//! transcriptions.

use spotter_domain::OutputFormat;
use spotter_extractor::{ExtractorConfig, ExtractorError, ParsedDocument, Serializer};

const DEED: &str = concat!(
    "<p>This indenture made between ",
    r#"<a id="101" title="Hinds, Howell">Howell Hinds</a>"#,
    " of the first part and ",
    r#"<a id="102" title="Barr, &quot;Wm.&quot; A.">Wm. A. Barr, Esq.</a>"#,
    ", witnesseth that ",
    r#"<a id="101" title="Hinds, Howell">the said Hinds</a>"#,
    " conveys the lot.</p>"
);

fn serializer(raw: &str, width: usize) -> Serializer {
    let mut config = ExtractorConfig::default();
    config.context_width = width;
    Serializer::new(raw, config)
}

#[test]
fn test_entities_in_document_order() {
    let serializer = serializer(DEED, 30);
    let ids: Vec<&str> = serializer.entities().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["101", "102", "101"]);
    assert_eq!(serializer.entities()[1].name, "Barr, \"Wm.\" A.");
    assert_eq!(serializer.entities()[2].text, "the said Hinds");
}

#[test]
fn test_locator_collects_same_id_with_different_text() {
    let serializer = serializer(DEED, 30);
    let entities = serializer.entities();

    assert_eq!(entities[0].locator, entities[2].locator);
    assert!(entities[0].locator.contains(">Howell Hinds</a>"));
    assert!(entities[0].locator.contains(">the said Hinds</a>"));
    assert!(!entities[1].locator.contains("Hinds"));
}

#[test]
fn test_distinct_anchors_get_their_own_context() {
    let serializer = serializer(DEED, 12);
    let entities = serializer.entities();

    assert_eq!(entities[0].preceding_context, "ade between ");
    assert_eq!(entities[2].preceding_context, "esseth that ");
    assert_eq!(entities[2].following_context, " conveys the");
}

#[test]
fn test_csv_survives_quotes_and_commas() {
    let serializer = serializer(DEED, 30);
    let csv = serializer.output(OutputFormat::Tabular).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[3], "Preceding 30 Characters");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][1], "Barr, \"Wm.\" A.");
    assert_eq!(&rows[1][2], "Wm. A. Barr, Esq.");
}

#[test]
fn test_json_round_trips_entities() {
    let serializer = serializer(DEED, 30);
    let json = serializer.output(OutputFormat::Structured).unwrap();
    let parsed: Vec<spotter_extractor::EntityRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(parsed, serializer.entities());
}

#[test]
fn test_markup_output_reparses_to_same_entities() {
    let serializer = serializer(DEED, 30);
    let markup = serializer.output(OutputFormat::Markup).unwrap();
    let reparsed = spotter_extractor::extract_entities(&ParsedDocument::parse(markup), 30);

    let ids: Vec<_> = reparsed.iter().map(|e| (&e.id, &e.name, &e.text)).collect();
    let original: Vec<_> = serializer.entities().iter().map(|e| (&e.id, &e.name, &e.text)).collect();
    assert_eq!(ids, original);
}

#[test]
fn test_replacing_output_never_leaks_old_entities() {
    let mut serializer = serializer(DEED, 30);
    for format in OutputFormat::ALL {
        serializer.output(format).unwrap();
    }

    serializer.set_raw_output("No subjects identified.");
    assert!(serializer.entities().is_empty());
    assert_eq!(serializer.output(OutputFormat::Structured).unwrap(), "[]");
    assert!(!serializer.output(OutputFormat::Tabular).unwrap().contains("Hinds"));
    assert_eq!(serializer.output(OutputFormat::Markup).unwrap(), "No subjects identified.\n");
}

#[test]
fn test_unsupported_token() {
    let serializer = serializer(DEED, 30);
    match serializer.output_for_token("tsv") {
        Err(ExtractorError::UnsupportedFormat(token)) => assert_eq!(token, "tsv"),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}
