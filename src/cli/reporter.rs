use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use jlc_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation};

/// Byte offsets of line starts, for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self { line_starts }
    }

    /// Zero-based `(line, column)`; the column counts characters, not bytes.
    pub fn position(&self, offset: u32, source: &str) -> (u32, u32) {
        let offset = offset.min(source.len() as u32);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line] as usize;
        let column = source
            .get(line_start..offset as usize)
            .map_or(offset as usize - line_start, |text| text.chars().count());
        (line as u32, column as u32)
    }
}

/// Renders diagnostics the way a compiler prints them on a terminal.
///
/// Source snippets are shown when the diagnostic's file can be read,
/// either directly or relative to `root`.
pub struct Reporter {
    color: bool,
    root: Option<PathBuf>,
    sources: FxHashMap<String, Option<String>>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            root: None,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.format_location(&diagnostic.file, diagnostic.start) {
            Some(location) => location,
            None if !diagnostic.file.is_empty() => diagnostic.file.clone(),
            None => "<unknown>".to_string(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
            if let Some(snippet) = self.format_snippet(&related.file, related.start, related.length)
            {
                output.push_str(&snippet);
            }
        }

        output
    }

    /// The offending line with the span underlined:
    ///
    /// ```text
    ///    12   Runnable r = () -> helper();
    ///                      ~~~~~~~~~~~~~~
    /// ```
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line, column) = self.position_for(file, start)?;
        let source = self.sources.get(file)?.as_deref()?;
        let line_text = source.lines().nth(line as usize)?;

        let underline_len = line_text
            .chars()
            .skip(column as usize)
            .take(length as usize)
            .count()
            .max(1);
        let indent: String = line_text
            .chars()
            .take(column as usize)
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        let underline = "~".repeat(underline_len);
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };

        Some(format!(
            "\n  {:>3}   {}\n        {}{}",
            line + 1,
            line_text,
            indent,
            underline
        ))
    }

    fn format_related(&mut self, related: &DiagnosticRelatedInformation) -> String {
        let location = self
            .format_location(&related.file, related.start)
            .unwrap_or_else(|| related.file.clone());
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{prefix}: {location} - {}", related.message_text)
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{file}:{}:{}", line + 1, column + 1))
    }

    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.source(file)?;
        let source = self.sources.get(file)?.as_deref()?;
        let map = self
            .line_maps
            .entry(file.to_string())
            .or_insert_with(|| LineMap::build(source));
        Some(map.position(offset, source))
    }

    /// Read and cache `file`; misses are cached too.
    fn source(&mut self, file: &str) -> Option<&str> {
        if !self.sources.contains_key(file) {
            let path = Path::new(file);
            let contents = std::fs::read_to_string(path).ok().or_else(|| {
                let root = self.root.as_ref()?;
                std::fs::read_to_string(root.join(path)).ok()
            });
            self.sources.insert(file.to_string(), contents);
        }
        self.sources.get(file)?.as_deref()
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }
        let label = format!("JLC{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
