//! Parsing of classifier `--breakdown` output
//!
//! Depending on its version the classifier prints either JSON or a
//! line-oriented listing. [`ClassifierOutput::parse`] is the only place that
//! decides which one it got.

use compact_str::CompactString;
use serde::Deserialize;
use tracing::{debug, warn};

/// Files the classifier attributed to one language
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LanguageBreakdown {
    pub name: CompactString,
    pub percent: f64,
    pub files: Vec<CompactString>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    /// `{"Rust": {"percentage": "12.34", "files": [...]}, ...}` in the order printed
    Structured(Vec<(CompactString, StructuredEntry)>),
    /// Summary lines, `Language:` sections and file paths
    Textual(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredEntry {
    pub percentage: Percentage,
    #[serde(default)]
    pub files: Vec<CompactString>,
}

/// Older releases print the percentage as a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Percentage {
    Number(f64),
    Text(CompactString),
}

impl Percentage {
    pub fn value(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().trim_end_matches('%').parse().unwrap_or_else(|_| {
                warn!(percentage = %text, "Unreadable percentage, counting as zero");
                0.0
            }),
        }
    }
}

impl ClassifierOutput {
    pub fn parse(stdout: &str) -> Self {
        let trimmed = stdout.trim_start();
        if trimmed.starts_with('{') {
            match parse_structured(trimmed) {
                Ok(entries) => return Self::Structured(entries),
                Err(e) => debug!(error = %e, "Classifier output is not JSON, reading as text"),
            }
        }
        Self::Textual(stdout.lines().map(str::to_string).collect())
    }

    pub fn into_breakdown(self) -> Vec<LanguageBreakdown> {
        match self {
            Self::Structured(entries) => entries
                .into_iter()
                .map(|(name, entry)| LanguageBreakdown {
                    name,
                    percent: entry.percentage.value(),
                    files: entry.files,
                })
                .collect(),
            Self::Textual(lines) => parse_textual(&lines),
        }
    }
}

fn parse_structured(
    json: &str,
) -> std::result::Result<Vec<(CompactString, StructuredEntry)>, serde_json::Error> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    map.into_iter()
        .map(|(name, value)| serde_json::from_value(value).map(|entry| (name.into(), entry)))
        .collect()
}

/// Lines that fit none of the expected shapes are skipped.
///
/// Only names made of word characters are recognised, so languages such as
/// `C++` or `Jupyter Notebook` are dropped from textual output. A summary
/// line or header for such a language also ends the current file section.
fn parse_textual(lines: &[String]) -> Vec<LanguageBreakdown> {
    let mut languages: Vec<LanguageBreakdown> = Vec::new();
    let mut current: Option<usize> = None;

    for line in lines {
        if line.trim().is_empty() {
            current = None;
            continue;
        }

        if let Some((name, percent)) = parse_summary_line(line) {
            let index = language_index(&mut languages, name);
            languages[index].percent = percent;
            current = Some(index);
        } else if let Some(name) = parse_section_header(line) {
            current = Some(language_index(&mut languages, name));
        } else if is_unreadable_heading(line) {
            debug!(line = %line.trim(), "Skipping unrecognised language line");
            current = None;
        } else if let Some(index) = current {
            languages[index].files.push(line.trim().into());
        }
    }

    languages
}

fn language_index(languages: &mut Vec<LanguageBreakdown>, name: &str) -> usize {
    if let Some(index) = languages.iter().position(|l| l.name == name) {
        return index;
    }
    languages.push(LanguageBreakdown { name: name.into(), ..Default::default() });
    languages.len() - 1
}

/// `66.84%  2345  Ruby`, `66.84% Ruby` or `Ruby: 66.84%`
fn parse_summary_line(line: &str) -> Option<(&str, f64)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if let [first, middle @ .., last] = tokens.as_slice()
        && let Some(percent) = parse_percent(first)
        && middle.len() <= 1
        && middle.iter().all(|t| t.parse::<u64>().is_ok())
        && is_word(last)
    {
        return Some((*last, percent));
    }

    if let [name, percent] = tokens.as_slice()
        && let Some(percent) = parse_percent(percent)
    {
        let name = name.strip_suffix(':').unwrap_or(*name);
        if is_word(name) {
            return Some((name, percent));
        }
    }

    None
}

fn parse_section_header(line: &str) -> Option<&str> {
    line.trim().strip_suffix(':').filter(|name| is_word(name))
}

/// Summary or header shape whose language name could not be read
fn is_unreadable_heading(line: &str) -> bool {
    let line = line.trim();
    let mut tokens = line.split_whitespace();
    let first_is_percent = tokens.next().is_some_and(|t| parse_percent(t).is_some());
    let last_is_percent = tokens.last().is_some_and(|t| parse_percent(t).is_some());
    first_is_percent || last_is_percent || line.ends_with(':')
}

fn parse_percent(token: &str) -> Option<f64> {
    token.strip_suffix('%')?.parse().ok()
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}
