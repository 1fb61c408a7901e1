// ABOUTME: Converts rendered note markup to GitHub-flavored Markdown
// ABOUTME: Also derives output filenames and extracts index_files image references

use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const MARKDOWN_EXT: &str = ".md";

/// Relative directory the service uses for a document's embedded resources.
pub const RESOURCE_DIR: &str = "index_files";

static RESOURCE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[\]\(index_files/(.*?)\)").unwrap());

static TASK_CHECKBOX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<input\b[^>]*\btype\s*=\s*["']?checkbox["']?[^>]*>"#).unwrap()
});

static CHECKED_ATTR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bchecked\b").unwrap());

/// Output filename for a document: the title, with `.md` appended unless already present.
pub fn output_filename(title: &str) -> String {
    if title.ends_with(MARKDOWN_EXT) {
        title.to_string()
    } else {
        format!("{}{}", title, MARKDOWN_EXT)
    }
}

#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    strip_backslashes: bool,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        MarkdownConverter {
            strip_backslashes: true,
        }
    }
}

impl MarkdownConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps backslashes emitted by the converter instead of deleting them all.
    pub fn keep_backslashes(mut self) -> Self {
        self.strip_backslashes = false;
        self
    }

    pub fn convert(&self, markup: &[u8]) -> Result<String> {
        let html = std::str::from_utf8(markup)
            .map_err(|e| Error::Convert(format!("document markup is not valid UTF-8: {}", e)))?;

        let html = render_task_checkboxes(html);
        let markdown = html2md::parse_html(&html);

        if self.strip_backslashes {
            // Lossy: also drops backslashes that were part of the note text.
            Ok(markdown.replace('\\', ""))
        } else {
            Ok(markdown)
        }
    }
}

/// Replaces checkbox inputs with GFM task markers so list items keep their state.
fn render_task_checkboxes(html: &str) -> std::borrow::Cow<'_, str> {
    TASK_CHECKBOX.replace_all(html, |caps: &Captures| {
        if CHECKED_ATTR.is_match(&caps[0]) {
            "[x] "
        } else {
            "[ ] "
        }
    })
}

/// Filenames referenced as `![](index_files/<name>)`, in order, duplicates kept.
pub fn extract_resource_refs(markdown: &str) -> Vec<String> {
    RESOURCE_REF
        .captures_iter(markdown)
        .map(|caps| caps[1].to_string())
        .collect()
}
