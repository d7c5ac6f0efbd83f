//! Render a parsed document or its entities in one output format
//!
//! - Markup: the document, pretty-printed with two-space indentation
//! - Tabular: a header row plus one force-quoted CSV row per entity
//! - Structured: the entities as a pretty-printed JSON array

use crate::document::{serialize_handle, ParsedDocument};
use crate::error::ExtractorError;
use html5ever::serialize::TraversalScope;
use markup5ever_rcdom::{Handle, NodeData};
use spotter_domain::{EntityRecord, OutputFormat};

const INDENT: &str = "  ";

/// Elements whose content is whitespace-sensitive and always written inline
const PRESERVE_CONTENT: &[&str] = &["pre", "textarea", "script", "style", "title"];

/// Render `doc` / `entities` in `format`
///
/// `context_width` only affects the tabular header labels.
pub fn render(
    doc: &ParsedDocument,
    entities: &[EntityRecord],
    format: OutputFormat,
    context_width: usize,
) -> Result<String, ExtractorError> {
    match format {
        OutputFormat::Markup => Ok(render_markup(doc)),
        OutputFormat::Tabular => render_tabular(entities, context_width),
        OutputFormat::Structured => render_structured(entities),
    }
}

/// Column labels of the tabular rendering
pub fn tabular_headers(context_width: usize) -> [String; 6] {
    [
        "Subject ID".to_string(),
        "Canonical Subject Name/Title".to_string(),
        "Verbatim Text".to_string(),
        format!("Preceding {} Characters", context_width),
        format!("Following {} Characters", context_width),
        "Locator".to_string(),
    ]
}

fn render_tabular(entities: &[EntityRecord], context_width: usize) -> Result<String, ExtractorError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(tabular_headers(context_width))?;
    for entity in entities {
        writer.write_record(entity.fields())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExtractorError::Serialization(format!("CSV flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ExtractorError::Serialization(format!("UTF-8 conversion failed: {}", e)))
}

fn render_structured(entities: &[EntityRecord]) -> Result<String, ExtractorError> {
    Ok(serde_json::to_string_pretty(entities)?)
}

fn render_markup(doc: &ParsedDocument) -> String {
    let mut out = String::new();
    write_children(doc.scope_root(), 0, &mut out);
    out
}

/// Children either go inline on one line (mixed content) or one per line
fn write_children(parent: &Handle, depth: usize, out: &mut String) {
    if has_inline_text(parent) {
        push_line(out, depth, &serialize_handle(parent, TraversalScope::ChildrenOnly(None)));
        return;
    }
    for child in parent.children.borrow().iter() {
        write_node(child, depth, out);
    }
}

fn write_node(node: &Handle, depth: usize, out: &mut String) {
    match &node.data {
        // Only whitespace-only text reaches here; block layout replaces it
        NodeData::Text { .. } => {}
        NodeData::Element { name, attrs, .. } => {
            let tag = &*name.local;
            let has_element_children = node
                .children
                .borrow()
                .iter()
                .any(|child| matches!(child.data, NodeData::Element { .. } | NodeData::Comment { .. }));

            if PRESERVE_CONTENT.contains(&tag) || !has_element_children || has_inline_text(node) {
                push_line(out, depth, &serialize_handle(node, TraversalScope::IncludeNode));
                return;
            }

            let mut open = format!("<{}", tag);
            for attr in attrs.borrow().iter() {
                open.push(' ');
                open.push_str(&attr.name.local);
                open.push_str("=\"");
                open.push_str(&escape_attribute(&attr.value));
                open.push('"');
            }
            open.push('>');

            push_line(out, depth, &open);
            write_children(node, depth + 1, out);
            push_line(out, depth, &format!("</{}>", tag));
        }
        NodeData::Document => write_children(node, depth, out),
        _ => push_line(out, depth, &serialize_handle(node, TraversalScope::IncludeNode)),
    }
}

fn has_inline_text(node: &Handle) -> bool {
    node.children.borrow().iter().any(|child| match &child.data {
        NodeData::Text { contents } => !contents.borrow().trim().is_empty(),
        _ => false,
    })
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    if line.is_empty() {
        return;
    }
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

/// Attribute escaping as performed by the html5ever serializer
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_entities;

    fn parsed(raw: &str) -> (ParsedDocument, Vec<EntityRecord>) {
        let doc = ParsedDocument::parse(raw);
        let entities = extract_entities(&doc, 30);
        (doc, entities)
    }

    #[test]
    fn test_markup_pretty_prints_block_structure() {
        let (doc, entities) = parsed(
            r#"<!DOCTYPE html><html><head><title>Bond</title></head><body><div><p>we <a id="1" title="Barr, W. A.">W. A. Barr</a></p></div></body></html>"#,
        );
        let markup = render(&doc, &entities, OutputFormat::Markup, 30).unwrap();

        assert_eq!(
            markup,
            concat!(
                "<!DOCTYPE html>\n",
                "<html>\n",
                "  <head>\n",
                "    <title>Bond</title>\n",
                "  </head>\n",
                "  <body>\n",
                "    <div>\n",
                "      <p>we <a id=\"1\" title=\"Barr, W. A.\">W. A. Barr</a></p>\n",
                "    </div>\n",
                "  </body>\n",
                "</html>\n",
            )
        );
    }

    #[test]
    fn test_markup_keeps_fragment_text_on_one_line() {
        let raw = r#"we <a id="1" title="Smith">Smith</a> and"#;
        let (doc, entities) = parsed(raw);
        let markup = render(&doc, &entities, OutputFormat::Markup, 30).unwrap();
        assert_eq!(markup, format!("{raw}\n"));
    }

    #[test]
    fn test_markup_escapes_rewritten_attributes() {
        let (doc, entities) = parsed(r#"<div title="A &amp; &quot;B&quot;"><p>x</p></div>"#);
        let markup = render(&doc, &entities, OutputFormat::Markup, 30).unwrap();
        assert!(markup.starts_with("<div title=\"A &amp; &quot;B&quot;\">\n"));
    }

    #[test]
    fn test_tabular_header_and_force_quoting() {
        let (doc, entities) = parsed(r#"we <a id="1" title="Smith, John">John Smith</a>"#);
        let csv = render(&doc, &entities, OutputFormat::Tabular, 30).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            concat!(
                r#""Subject ID","Canonical Subject Name/Title","Verbatim Text","#,
                r#""Preceding 30 Characters","Following 30 Characters","Locator""#
            )
        );
        assert_eq!(
            lines.next().unwrap(),
            concat!(
                r#""1","Smith, John","John Smith","we ","","#,
                r#""<a id=""1"" title=""Smith, John"">John Smith</a>""#
            )
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_tabular_header_follows_width() {
        let headers = tabular_headers(12);
        assert_eq!(headers[3], "Preceding 12 Characters");
        assert_eq!(headers[4], "Following 12 Characters");
    }

    #[test]
    fn test_tabular_round_trips_delimiters() {
        let entity = EntityRecord {
            id: "1".to_string(),
            name: "Barr, \"Wm\"".to_string(),
            text: "W. A. Barr, Esq.\nof \"Pontotoc\"".to_string(),
            ..Default::default()
        };
        let doc = ParsedDocument::parse("");
        let csv = render(&doc, std::slice::from_ref(&entity), OutputFormat::Tabular, 30).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], entity.name);
        assert_eq!(&record[2], entity.text);
    }

    #[test]
    fn test_structured_listing() {
        let (doc, entities) = parsed(r#"<a id="1" title="Smith">Smith</a>"#);
        let json = render(&doc, &entities, OutputFormat::Structured, 30).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "1");
        assert_eq!(value[0]["name"], "Smith");
        assert_eq!(value[0]["preceding_context"], "");
        assert!(json.contains("\n  {\n    \"id\": \"1\","));
    }

    #[test]
    fn test_empty_document_renders_every_format() {
        let (doc, entities) = parsed("No subjects here.");
        assert!(entities.is_empty());

        for format in OutputFormat::ALL {
            assert!(render(&doc, &entities, format, 30).is_ok());
        }
        assert_eq!(render(&doc, &entities, OutputFormat::Structured, 30).unwrap(), "[]");
        assert_eq!(render(&doc, &entities, OutputFormat::Tabular, 30).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let (doc, entities) = parsed(r#"<p>we <a id="1" title="Smith">Smith</a></p><p>and <a id="2" title="Jones">Jones</a></p>"#);
        for format in OutputFormat::ALL {
            assert_eq!(
                render(&doc, &entities, format, 30).unwrap(),
                render(&doc, &entities, format, 30).unwrap()
            );
        }
    }
}
