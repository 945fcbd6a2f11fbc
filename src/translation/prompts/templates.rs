/*!
 * System prompt templates.
 *
 * Templates carry `{source_language}` and `{target_language}` placeholders
 * that are replaced with language display names before each request.
 */

/// System prompt template for chunk translation.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for documentary scripts and religious texts.
    pub const DOCUMENTARY_TRANSLATOR: &'static str = r#"You are a translator specialized in biblical documentary scripts and religious texts.

## Task
Translate the text you receive from {source_language} to {target_language} with complete fidelity to the original content.

## Theological Preservation
- Keep the exact theological and doctrinal meaning
- Preserve every biblical name (Jesus, Jerusalem, Abraham, etc.)
- Render technical religious terms precisely

## Narrative Style
- Keep the narrative tone of a documentary
- Preserve the rhythm and cadence of the original
- Keep the dramatic and emotional force of each passage

## Structural Fidelity
- Keep ALL paragraphs and line breaks
- Preserve time markers (e.g. "0:00-2:30")
- Keep titles and subtitles in their original format

## Language Quality
- Use fluent, educated {target_language}
- Avoid literal renderings that sound unnatural
- Adapt idioms while keeping their original meaning

## Restrictions
- Do NOT add explanations, notes or comments
- Do NOT omit or summarize any part of the text
- Do NOT change numbers, dates or biblical references
- Return ONLY the translation, without preface or conclusion"#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Create the default documentary translator template.
    pub fn documentary_translator() -> Self {
        Self::new(Self::DOCUMENTARY_TRANSLATOR)
    }

    /// Raw template text
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Render the template with the given language names.
    pub fn render(&self, source_language: &str, target_language: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::documentary_translator()
    }
}
