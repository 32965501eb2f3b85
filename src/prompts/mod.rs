//! Prompt templates for code review requests
//!
//! Pure string builders, no state. The system prompt sets the reviewer
//! persona; the two user-message variants cover a first submission and a
//! follow-up against the most recent prior review.

/// System message sent with every inference request
pub const SYSTEM_PROMPT: &str = "You are an expert code reviewer. Analyze the submitted code for \
correctness bugs, security issues, performance problems, and readability. Be specific, reference \
the relevant lines, and keep the review concise and actionable.";

/// Build the user message for a session's first review
///
/// The code is fenced with the caller-supplied language tag; the optional
/// context hint is appended as its own line before the closing
/// instruction.
///
/// # Examples
///
/// ```
/// use reviewd::prompts::format_initial_prompt;
///
/// let prompt = format_initial_prompt("fn main() {}", "rust", None);
/// assert!(prompt.contains("```rust"));
/// ```
pub fn format_initial_prompt(code: &str, language: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "Please review the following {language} code:\n\n```{language}\n{code}\n```\n"
    );

    if let Some(context) = context {
        prompt.push_str(&format!("\nContext: {context}\n"));
    }

    prompt.push_str(
        "\nProvide a thorough review covering correctness, potential bugs, and concrete improvements.",
    );

    prompt
}

/// Build the user message for a follow-up review
///
/// Embeds the most recent prior review verbatim, then the new code fenced,
/// then asks for a comparison against that review.
pub fn format_follow_up_prompt(previous_review: &str, code: &str, language: &str) -> String {
    format!(
        "You previously reviewed code in this session. Your most recent review was:\n\n\
{previous_review}\n\n\
The developer has submitted updated {language} code:\n\n```{language}\n{code}\n```\n\n\
Review the new code and compare it against your previous review: note which issues were \
addressed and flag anything newly introduced."
    )
}
