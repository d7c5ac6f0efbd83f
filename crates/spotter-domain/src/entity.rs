//! Entity module - one annotated subject recovered from model output

use serde::{Deserialize, Serialize};

/// A subject annotation recovered from markup, with its surrounding context
///
/// Field order is significant: structured and tabular renderings emit the
/// fields in declaration order.
///
/// `id` is not unique. The same subject may be annotated several times in one
/// document, and each occurrence yields its own record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Verbatim `id` attribute of the annotation (empty when absent)
    pub id: String,

    /// Verbatim `title` attribute, the canonical subject name (empty when absent)
    pub name: String,

    /// Text enclosed by the annotation, whitespace-trimmed
    pub text: String,

    /// Serialized markup immediately before the opening tag, at most N characters
    pub preceding_context: String,

    /// Serialized markup immediately after the closing tag, at most N characters
    pub following_context: String,

    /// Markup of every annotation in the document carrying this `id`, concatenated
    pub locator: String,
}

impl EntityRecord {
    /// Fields in output order, as borrowed strings
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.id,
            &self.name,
            &self.text,
            &self.preceding_context,
            &self.following_context,
            &self.locator,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EntityRecord {
        EntityRecord {
            id: "32042656".to_string(),
            name: "McClendon, Stephen".to_string(),
            text: "Stephen McClendon".to_string(),
            preceding_context: "that we ".to_string(),
            following_context: " and".to_string(),
            locator: "<a id=\"32042656\">Stephen McClendon</a>".to_string(),
        }
    }

    #[test]
    fn test_fields_follow_declaration_order() {
        let record = sample();
        assert_eq!(
            record.fields(),
            [
                "32042656",
                "McClendon, Stephen",
                "Stephen McClendon",
                "that we ",
                " and",
                "<a id=\"32042656\">Stephen McClendon</a>",
            ]
        );
    }

    #[test]
    fn test_json_keeps_field_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        let positions: Vec<usize> = [
            "\"id\"",
            "\"name\"",
            "\"text\"",
            "\"preceding_context\"",
            "\"following_context\"",
            "\"locator\"",
        ]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
