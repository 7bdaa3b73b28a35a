//! Prompt templates for summarization

use crate::types::ReadingLevel;

/// Prompt asking for a summary pitched at the given reading level
pub fn summary_prompt(level: ReadingLevel, text: &str) -> String {
    format!(
        "Provide a {} level summary of the following text:\n\n{}",
        level.prompt_word(),
        text
    )
}
