//! README summarization.
//!
//! The built-in [`ExtractiveSummarizer`] keeps the README's title and its
//! opening prose, stripped of Markdown. Anything smarter plugs in through
//! [`Summarizer`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sigil_github::Readme;

/// A README summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Title taken from the first heading, if any.
    pub title: Option<String>,
    /// Summary text.
    pub text: String,
}

/// Produces a summary from README text.
pub trait Summarizer: Send + Sync {
    /// Summarizes a README.
    fn summarize(&self, readme: &Readme) -> Summary;
}

/// Fallback text when a README has no prose.
const EMPTY_SUMMARY: &str = "No description available.";

static IMAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("Invalid regex"));
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("Invalid regex"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("Invalid regex"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\*\*|__|`)").expect("Invalid regex"));
static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Title plus leading paragraphs, cut to a character budget.
#[derive(Debug, Clone)]
pub struct ExtractiveSummarizer {
    max_chars: usize,
}

impl ExtractiveSummarizer {
    /// Creates a summarizer producing at most `max_chars` characters of text.
    #[must_use]
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(600)
    }
}

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, readme: &Readme) -> Summary {
        let mut title = None;
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut in_fence = false;
        let mut budget = 0usize;

        for raw in readme.text.lines() {
            let line = raw.trim();

            if line.starts_with("```") || line.starts_with("~~~") {
                in_fence = !in_fence;
                flush(&mut current, &mut paragraphs, &mut budget);
                continue;
            }
            if in_fence {
                continue;
            }

            if let Some(heading) = line.strip_prefix('#') {
                flush(&mut current, &mut paragraphs, &mut budget);
                if title.is_none() {
                    let heading = clean_inline(heading.trim_start_matches('#'));
                    if !heading.is_empty() {
                        title = Some(heading);
                    }
                }
                continue;
            }

            // Setext underline: the text collected above it is a heading.
            if !line.is_empty() && line.chars().all(|c| c == '=') {
                let heading = std::mem::take(&mut current);
                if title.is_none() && !heading.is_empty() {
                    title = Some(heading);
                }
                continue;
            }

            if line.is_empty() || is_non_prose(line) {
                flush(&mut current, &mut paragraphs, &mut budget);
                if budget >= self.max_chars {
                    break;
                }
                continue;
            }

            let cleaned = clean_inline(line);
            if cleaned.is_empty() {
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&cleaned);
        }
        flush(&mut current, &mut paragraphs, &mut budget);

        let body = paragraphs.join(" ");
        let text = if body.is_empty() {
            title.clone().unwrap_or_else(|| EMPTY_SUMMARY.to_string())
        } else {
            truncate(&body, self.max_chars)
        };

        Summary { title, text }
    }
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>, budget: &mut usize) {
    if !current.is_empty() {
        *budget += current.chars().count();
        paragraphs.push(std::mem::take(current));
    }
}

fn is_non_prose(line: &str) -> bool {
    line.starts_with('|')
        || line.starts_with('>')
        || line.starts_with("[!")
        || line.starts_with("![")
        || line.starts_with("[![")
        || (line.starts_with('<') && HTML_TAG.replace_all(line, "").trim().is_empty())
        || (line.len() >= 3 && line.chars().all(|c| matches!(c, '-' | '*' | '_' | ' ')))
        || (line.starts_with('[') && line.contains("]: "))
}

fn clean_inline(s: &str) -> String {
    let s = IMAGE.replace_all(s, "");
    let s = LINK.replace_all(&s, "$1");
    let s = HTML_TAG.replace_all(&s, "");
    let s = EMPHASIS.replace_all(&s, "");
    SPACES.replace_all(s.trim(), " ").into_owned()
}

/// Cuts `s` to at most `max_chars` characters on a word boundary.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == ';'))
}
