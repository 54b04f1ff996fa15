use crate::error::{MindmapError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

static ATX_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").unwrap());
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Supplies the headings of a document referenced by a file node.
///
/// `Ok(None)` means the document is unknown or has no heading data; errors
/// are reserved for a provider that failed to read something it should have.
pub trait HeadingsProvider {
    fn headings(&self, file: &str) -> Result<Option<Vec<Heading>>>;
}

/// Extracts ATX headings from markdown text, ignoring fenced code blocks.
pub fn parse_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut fence: Option<String> = None;
    for line in markdown.lines() {
        if let Some(caps) = FENCE_RE.captures(line) {
            let marker = &caps[1];
            match &fence {
                Some(open) if marker.starts_with(open.as_str()) => fence = None,
                Some(_) => {}
                None => fence = Some(marker.to_string()),
            }
            continue;
        }
        if fence.is_some() {
            continue;
        }
        let Some(caps) = ATX_HEADING_RE.captures(line) else {
            continue;
        };
        let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
        if text.is_empty() {
            continue;
        }
        headings.push(Heading::new(caps[1].len() as u8, text));
    }
    headings
}

/// Reads markdown files relative to a vault directory.
#[derive(Debug, Clone)]
pub struct MarkdownHeadings {
    root: PathBuf,
}

impl MarkdownHeadings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl HeadingsProvider for MarkdownHeadings {
    fn headings(&self, file: &str) -> Result<Option<Vec<Heading>>> {
        let path = self.root.join(file);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(parse_headings(&contents))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "document not found, no headings");
                Ok(None)
            }
            Err(err) => Err(MindmapError::Headings {
                file: file.to_string(),
                message: err.to_string(),
            }),
        }
    }
}

/// In-memory provider keyed by file path.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadings {
    files: HashMap<String, Vec<Heading>>,
}

impl StaticHeadings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file: impl Into<String>, headings: Vec<Heading>) -> Self {
        self.files.insert(file.into(), headings);
        self
    }
}

impl HeadingsProvider for StaticHeadings {
    fn headings(&self, file: &str) -> Result<Option<Vec<Heading>>> {
        Ok(self.files.get(file).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_atx_headings() {
        let doc = "# Intro\ntext\n## Details ##\n#NoSpace\n   ### Indented\n#\n# Outro";
        let headings = parse_headings(doc);
        assert_eq!(
            headings,
            vec![
                Heading::new(1, "Intro"),
                Heading::new(2, "Details"),
                Heading::new(3, "Indented"),
                Heading::new(1, "Outro"),
            ]
        );
    }

    #[test]
    fn skips_fenced_code() {
        let doc = "# Real\n```sh\n# not a heading\n```\n~~~\n# also not\n~~~\n# After";
        let texts: Vec<_> = parse_headings(doc).into_iter().map(|h| h.text).collect();
        assert_eq!(texts, vec!["Real", "After"]);
    }

    #[test]
    fn static_provider_returns_none_for_unknown_files() {
        let provider = StaticHeadings::new().with("a.md", vec![Heading::new(1, "A")]);
        assert_eq!(provider.headings("a.md").unwrap().unwrap().len(), 1);
        assert_eq!(provider.headings("b.md").unwrap(), None);
    }

    #[test]
    fn markdown_provider_treats_missing_files_as_none() {
        let provider = MarkdownHeadings::new(std::env::temp_dir());
        assert_eq!(
            provider.headings("canvas-mindmap-missing-file.md").unwrap(),
            None
        );
    }
}
