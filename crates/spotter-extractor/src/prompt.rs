//! LLM prompt templates for subject annotation

use spotter_domain::PromptTemplate;

/// Fills a built-in template with the transcription and subject listing
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptFormatter {
    template: PromptTemplate,
}

impl PromptFormatter {
    /// Create a formatter for `template`
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    /// Template in use
    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Switch to another template
    pub fn set_template(&mut self, template: PromptTemplate) {
        self.template = template;
    }

    /// Raw template text with `{{placeholders}}`
    pub fn template_source(&self) -> &'static str {
        match self.template {
            PromptTemplate::Template1 => TEMPLATE1,
            PromptTemplate::Template2 => TEMPLATE2,
        }
    }

    /// Build the prompt; a missing user context renders as an empty line
    pub fn generate_prompt(
        &self,
        text: &str,
        subject_listing: &str,
        user_context: Option<&str>,
    ) -> String {
        fill(
            self.template_source(),
            &[
                ("text", text),
                ("subject_listing", subject_listing),
                ("user_context", user_context.unwrap_or("")),
            ],
        )
    }
}

/// Single-pass placeholder substitution
///
/// Inserted values are never rescanned, so a transcription that itself
/// contains `{{text}}` is copied through unchanged.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let key = after_open[..close].trim();
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    out.push_str(rest);
    out
}

const TEMPLATE1: &str = r#"TASK: Process the given transcription and annotate entities using the provided subject list.

### CONTEXT:
{{user_context}}

### SUBJECTS:
{{subject_listing}}

### TRANSCRIPTION:
{{text}}

### INSTRUCTIONS:
- Identify and match subjects in the transcription.
- Use the categorization and description to resolve ambiguity.
- Wrap matched entities in `<a>` tags with:
  - `id` attribute as the subject’s ID.
  - `title` attribute as the subject’s title.
- **DO NOT** modify the text except to add annotations.
- **DO NOT** provide explanations, reasoning, or any additional text.
- **RETURN ONLY** the processed transcription.

### EXAMPLE:
**INPUT:**
I talked to Mr. H. Hinds yesterday.

**OUTPUT:**
I talked to <a id="94795" title="Hinds, Howell">Mr. H. Hinds</a> yesterday.

### RESPONSE FORMAT:
[Processed transcription with annotated subjects. No extra text.]
"#;

const TEMPLATE2: &str = r#"Annotate the transcription below using the subject list.
Wrap every mention of a listed subject in <a id="SUBJECT_ID" title="SUBJECT_TITLE">...</a>.
Leave all other text exactly as it is. Return only the annotated transcription.

Context: {{user_context}}

Subjects:
{{subject_listing}}

Transcription:
{{text}}
"#;
