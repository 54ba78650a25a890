//! AI-assisted subtask suggestions.
//!
//! A task's title and description are turned into a prompt, forwarded to an external
//! generative text API by [`SuggestionClient`], and the free-form answer is split into a
//! list of subtasks with [`parse_subtasks`].

pub mod client;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use client::SuggestionClient;

/// Upper bound on the number of subtasks returned to the client.
pub const MAX_SUBTASKS: usize = 10;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SuggestionRequest {
    #[validate(length(min = 1, max = 200), custom = "crate::models::task::not_blank")]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionResponse {
    pub subtasks: Vec<String>,
}

pub fn build_prompt(request: &SuggestionRequest) -> String {
    let mut prompt = String::from(
        "Break down the following task into 3 to 7 concise, actionable subtasks. \
         Respond with one subtask per line and nothing else.\n\n",
    );
    prompt.push_str("Task: ");
    prompt.push_str(request.title.trim());
    if let Some(description) = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        prompt.push_str("\nDetails: ");
        prompt.push_str(description);
    }
    prompt
}

/// Splits generated text into subtasks.
///
/// Each non-blank line becomes one entry once list markers (`-`, `*`, `•`, `1.`, `2)`) and
/// surrounding `**` emphasis are stripped. Markdown code fences are skipped.
pub fn parse_subtasks(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("```"))
        .map(strip_marker)
        .map(|line| line.trim_matches('*').trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_SUBTASKS)
        .collect()
}

fn strip_marker(line: &str) -> &str {
    if let Some(rest) = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))
    {
        return rest.trim_start();
    }

    // `1.` or `2)` followed by whitespace; `1.5 hours` is content, not an enumerator.
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim_start();
            }
        }
    }
    line
}
