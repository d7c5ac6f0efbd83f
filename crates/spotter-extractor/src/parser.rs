//! Turn annotated model output into entity records
//!
//! Every `<a id=".." title="..">` element becomes one [`EntityRecord`]. The
//! context windows are cut from the canonical serialization of the document,
//! so they contain markup (neighbouring tags included), not plain text.
//!
//! The position of an anchor is found by searching for its own serialized
//! markup in the canonical string and taking the first hit. Two anchors that
//! serialize identically therefore receive identical context windows, both
//! taken from the first occurrence.

use crate::document::{attribute_value, outer_markup, text_content, ParsedDocument};
use spotter_domain::EntityRecord;
use std::collections::HashMap;
use tracing::{debug, warn};

const ANCHOR_TAG: &str = "a";
const ID_ATTRIBUTE: &str = "id";
const NAME_ATTRIBUTE: &str = "title";

/// Extract one record per anchor, in document order
///
/// `context_width` is measured in characters. Windows are clipped at the
/// document bounds and never padded.
pub fn extract_entities(doc: &ParsedDocument, context_width: usize) -> Vec<EntityRecord> {
    let anchors = doc.elements(ANCHOR_TAG);
    if anchors.is_empty() {
        debug!("No annotations found");
        return Vec::new();
    }

    let canonical = doc.canonical_markup();
    let locators = locators_by_id(doc);

    let entities: Vec<EntityRecord> = anchors
        .iter()
        .map(|anchor| {
            let id = attribute_value(anchor, ID_ATTRIBUTE).unwrap_or_default();
            let name = attribute_value(anchor, NAME_ATTRIBUTE).unwrap_or_default();
            let markup = outer_markup(anchor);

            let (preceding_context, following_context) =
                match context_window(&canonical, &markup, context_width) {
                    Some(window) => window,
                    None => {
                        warn!("Annotation '{}' not found in serialized document", id);
                        (String::new(), String::new())
                    }
                };

            EntityRecord {
                locator: locators.get(&id).cloned().unwrap_or_default(),
                text: text_content(anchor).trim().to_string(),
                id,
                name,
                preceding_context,
                following_context,
            }
        })
        .collect();

    debug!("Extracted {} entities", entities.len());
    entities
}

/// Preceding and following windows around the first occurrence of `needle`
fn context_window(haystack: &str, needle: &str, width: usize) -> Option<(String, String)> {
    let start = haystack.find(needle)?;
    let end = start + needle.len();

    Some((
        last_chars(&haystack[..start], width),
        first_chars(&haystack[end..], width),
    ))
}

fn last_chars(s: &str, n: usize) -> String {
    if n == 0 {
        return String::new();
    }
    let cut = s
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    s[cut..].to_string()
}

fn first_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Locator markup keyed by id value, built in one pass over the document
///
/// Only anchors that carry an `id` attribute are indexed, mirroring an
/// attribute-equality query: an anchor without `id` is never matched, even by
/// an empty id.
fn locators_by_id(doc: &ParsedDocument) -> HashMap<String, String> {
    let mut locators: HashMap<String, String> = HashMap::new();
    for anchor in doc.all_elements(ANCHOR_TAG) {
        if let Some(id) = attribute_value(&anchor, ID_ATTRIBUTE) {
            locators.entry(id).or_default().push_str(&outer_markup(&anchor));
        }
    }
    locators
}
