//! System prompt composition.

use pdfchat_core::DEFAULT_SYSTEM_PROMPT;

pub const QUESTION_PLACEHOLDER: &str = "{question}";
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Fill `template` with a question and retrieved context snippets.
///
/// Only the first `{question}` and then the first `{context}` are replaced;
/// any further occurrences stay literal. Snippets are joined by a blank line.
pub fn compose_prompt<S: AsRef<str>>(template: &str, question: &str, contexts: &[S]) -> String {
    let context = contexts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n\n");

    template
        .replacen(QUESTION_PLACEHOLDER, question, 1)
        .replacen(CONTEXT_PLACEHOLDER, &context, 1)
}

/// [`compose_prompt`] over [`DEFAULT_SYSTEM_PROMPT`].
pub fn create_system_prompt<S: AsRef<str>>(question: &str, contexts: &[S]) -> String {
    compose_prompt(DEFAULT_SYSTEM_PROMPT, question, contexts)
}
