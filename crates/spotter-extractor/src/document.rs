//! Lenient markup parsing and canonical serialization
//!
//! Model output is parsed with `html5ever`, which follows the WHATWG recovery
//! rules and therefore never rejects input. The parsed tree lives in a
//! `markup5ever_rcdom::RcDom`.
//!
//! # Serialization scope
//!
//! Model output is usually a bare fragment of annotated text. The HTML parser
//! wraps such a fragment in synthetic `<html><head></head><body>` elements;
//! serializing those would put wrapper markup into every context window. The
//! scope therefore depends on the input:
//!
//! | Input begins with         | Scope                         |
//! |---------------------------|-------------------------------|
//! | `<!doctype` or `<html`    | the whole document            |
//! | anything else             | the children of `<body>`      |
//!
//! In body scope, anything the parser places outside `<body>` is left out of
//! the canonical string. That covers head-only elements such as `<title>` or
//! `<meta>` and comments that come before the first element. Anchors in those
//! places are still extracted, but get empty context windows.
//!
//! Scripting is disabled while parsing, so `<noscript>` content is parsed as
//! markup and anchors inside it are found.
//!
//! Element lookups by attribute always search the whole document.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use html5ever::{parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use tracing::warn;

/// Parsed form of one raw model response
pub struct ParsedDocument {
    dom: RcDom,
    root: Handle,
    full_document: bool,
}

impl ParsedDocument {
    /// Parse raw markup. Never fails; malformed markup is repaired.
    pub fn parse(raw: &str) -> Self {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), opts).one(raw);
        let full_document = looks_like_full_document(raw);

        let root = if full_document {
            dom.document.clone()
        } else {
            find_body(&dom.document).unwrap_or_else(|| dom.document.clone())
        };

        Self {
            dom,
            root,
            full_document,
        }
    }

    /// Whether the input was a complete document rather than a fragment
    pub fn is_full_document(&self) -> bool {
        self.full_document
    }

    /// Serialize the scope to its canonical markup string
    ///
    /// All context offsets are computed against this string.
    pub fn canonical_markup(&self) -> String {
        serialize_handle(&self.root, TraversalScope::ChildrenOnly(None))
    }

    /// Concatenated markup of every `tag` element whose `attribute` equals `value`
    ///
    /// Elements lacking the attribute never match, not even an empty `value`.
    pub fn locate(&self, tag: &str, attribute: &str, value: &str) -> String {
        let mut matches = Vec::new();
        collect_elements(&self.dom.document, tag, &mut matches);

        matches
            .iter()
            .filter(|handle| attribute_value(handle, attribute).as_deref() == Some(value))
            .map(outer_markup)
            .collect()
    }

    /// All `tag` elements inside the scope, in document order
    pub(crate) fn elements(&self, tag: &str) -> Vec<Handle> {
        let mut found = Vec::new();
        collect_elements(&self.root, tag, &mut found);
        found
    }

    /// All `tag` elements in the whole document, in document order
    pub(crate) fn all_elements(&self, tag: &str) -> Vec<Handle> {
        let mut found = Vec::new();
        collect_elements(&self.dom.document, tag, &mut found);
        found
    }

    /// Node whose children make up the scope
    pub(crate) fn scope_root(&self) -> &Handle {
        &self.root
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("full_document", &self.full_document)
            .finish_non_exhaustive()
    }
}

fn looks_like_full_document(raw: &str) -> bool {
    let head: String = raw
        .trim_start_matches('\u{feff}')
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = document
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "html"))
        .cloned()?;

    let body = html
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "body"))
        .cloned();
    body
}

/// Pre-order walk collecting elements named `tag`
fn collect_elements(handle: &Handle, tag: &str, found: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if is_element(child, tag) {
            found.push(child.clone());
        }
        collect_elements(child, tag, found);
    }
}

pub(crate) fn is_element(handle: &Handle, tag: &str) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => &*name.local == tag,
        _ => false,
    }
}

/// Value of an attribute, `None` when the attribute is absent
pub(crate) fn attribute_value(handle: &Handle, attribute: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attribute)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Concatenated text of every descendant text node
pub(crate) fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    push_text(handle, &mut text);
    text
}

fn push_text(handle: &Handle, text: &mut String) {
    if let NodeData::Text { contents } = &handle.data {
        text.push_str(&contents.borrow());
    }
    for child in handle.children.borrow().iter() {
        push_text(child, text);
    }
}

/// Serialized markup of a node including its own tags
pub(crate) fn outer_markup(handle: &Handle) -> String {
    serialize_handle(handle, TraversalScope::IncludeNode)
}

pub(crate) fn serialize_handle(handle: &Handle, scope: TraversalScope) -> String {
    let mut output = Vec::new();
    let serializable = SerializableHandle::from(handle.clone());
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };

    if let Err(e) = serialize(&mut output, &serializable, opts) {
        // Writing into a Vec only fails on serializer bugs; keep what was written
        warn!("HTML serialization failed: {}", e);
    }

    match String::from_utf8(output) {
        Ok(markup) => markup,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_canonical_markup_is_the_fragment() {
        let raw = r#"we <a id="1" title="Smith, John">John Smith</a> and"#;
        let doc = ParsedDocument::parse(raw);

        assert!(!doc.is_full_document());
        assert_eq!(doc.canonical_markup(), raw);
    }

    #[test]
    fn test_full_document_keeps_wrapper() {
        let raw = "<!DOCTYPE html><html><head><title>T</title></head><body><p>x</p></body></html>";
        let doc = ParsedDocument::parse(raw);

        assert!(doc.is_full_document());
        assert_eq!(doc.canonical_markup(), raw);
    }

    #[test]
    fn test_html_prefix_is_case_insensitive() {
        let doc = ParsedDocument::parse("  <HTML><body>x</body></HTML>");
        assert!(doc.is_full_document());
        assert!(doc.canonical_markup().starts_with("<html>"));
    }

    #[test]
    fn test_malformed_markup_is_repaired() {
        let doc = ParsedDocument::parse(r#"<a id="1" title="Open">never closed"#);
        assert_eq!(
            doc.canonical_markup(),
            r#"<a id="1" title="Open">never closed</a>"#
        );
    }

    #[test]
    fn test_empty_input() {
        let doc = ParsedDocument::parse("");
        assert_eq!(doc.canonical_markup(), "");
        assert!(doc.elements("a").is_empty());
    }

    #[test]
    fn test_locate_concatenates_all_matches() {
        let doc = ParsedDocument::parse(
            r#"<a id="7" title="X">one</a> <a id="8" title="Y">two</a> <a id="7" title="X">three</a>"#,
        );

        assert_eq!(
            doc.locate("a", "id", "7"),
            r#"<a id="7" title="X">one</a><a id="7" title="X">three</a>"#
        );
        assert_eq!(doc.locate("a", "id", "9"), "");
    }

    #[test]
    fn test_locate_empty_value_requires_attribute() {
        let doc = ParsedDocument::parse(r#"<a title="no id">a</a><a id="" title="blank">b</a>"#);
        assert_eq!(doc.locate("a", "id", ""), r#"<a id="" title="blank">b</a>"#);
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = ParsedDocument::parse(r#"<p><a id="1">x</a></p><div><p><a id="2">y</a></p></div><a id="3">z</a>"#);
        let ids: Vec<_> = doc
            .elements("a")
            .iter()
            .map(|h| attribute_value(h, "id").unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_content_includes_descendants() {
        let doc = ParsedDocument::parse(r#"<a id="1"> Mr. <b>H.</b> Hinds </a>"#);
        let anchor = &doc.elements("a")[0];
        assert_eq!(text_content(anchor), " Mr. H. Hinds ");
    }

    #[test]
    fn test_attribute_escaping_in_canonical_markup() {
        let doc = ParsedDocument::parse(r#"<a id="1" title="O'Brien &amp; &quot;Sons&quot;">x &amp; y</a>"#);
        assert_eq!(
            doc.canonical_markup(),
            r#"<a id="1" title="O'Brien &amp; &quot;Sons&quot;">x &amp; y</a>"#
        );
        let anchor = &doc.elements("a")[0];
        assert_eq!(
            attribute_value(anchor, "title").as_deref(),
            Some(r#"O'Brien & "Sons""#)
        );
    }

    #[test]
    fn test_noscript_content_is_markup() {
        let doc = ParsedDocument::parse(r#"<noscript><a id="1" title="Hidden">x</a></noscript>"#);
        let anchors = doc.elements("a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(attribute_value(&anchors[0], "id").as_deref(), Some("1"));
    }

    #[test]
    fn test_leading_comment_is_outside_body_scope() {
        let doc = ParsedDocument::parse(r#"<!-- c --><a id="1">x</a>"#);
        assert_eq!(doc.canonical_markup(), r#"<a id="1">x</a>"#);
        assert_eq!(doc.elements("a").len(), 1);
    }
}
