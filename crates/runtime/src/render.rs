use std::fmt;
use std::ops::Range;

use serde::Serialize;

use coach_clients::SearchResult;

/// Query words of this many characters or fewer are never highlighted.
pub const MAX_UNHIGHLIGHTED_TOKEN_CHARS: usize = 3;

pub const ANSI_HIGHLIGHT_OPEN: &str = "\u{1b}[1;33m";
pub const ANSI_HIGHLIGHT_CLOSE: &str = "\u{1b}[0m";

/// Wraps query words found in a passage with a pair of markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self { open: open.into(), close: close.into() }
    }

    pub fn ansi() -> Self {
        Self::new(ANSI_HIGHLIGHT_OPEN, ANSI_HIGHLIGHT_CLOSE)
    }

    /// Every case-insensitive occurrence of each query word longer than three
    /// characters gets wrapped once. Overlapping hits are merged first, and text
    /// already inside a marked span is skipped, so highlighting twice is a no-op.
    pub fn highlight(&self, text: &str, query: &str) -> String {
        let tokens = query
            .split_whitespace()
            .filter(|token| token.chars().count() > MAX_UNHIGHLIGHTED_TOKEN_CHARS)
            .map(|token| token.chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        if tokens.is_empty() {
            return text.to_string();
        }

        let marked = self.marked_spans(text);
        let chars = text.char_indices().collect::<Vec<_>>();

        let mut hits = vec![];
        for token in &tokens {
            for start in 0..chars.len() {
                let Some(end) = match_at(text, &chars, start, token) else {
                    continue;
                };
                let hit = chars[start].0..end;
                if !marked.iter().any(|span| overlaps(span, &hit)) {
                    hits.push(hit);
                }
            }
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for hit in merge(hits) {
            out.push_str(&text[cursor..hit.start]);
            out.push_str(&self.open);
            out.push_str(&text[hit.clone()]);
            out.push_str(&self.close);
            cursor = hit.end;
        }
        out.push_str(&text[cursor..]);
        out
    }

    /// Byte ranges of existing `open ... close` spans, markers included.
    fn marked_spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans = vec![];
        if self.open.is_empty() {
            return spans;
        }

        let mut from = 0;
        while let Some(offset) = text[from..].find(&self.open) {
            let start = from + offset;
            let body = start + self.open.len();
            let end = match text[body..].find(&self.close) {
                Some(offset) if !self.close.is_empty() => body + offset + self.close.len(),
                _ => body,
            };
            spans.push(start..end);
            from = end;
        }
        spans
    }
}

/// Byte offset just past `token` if it matches at char index `start`.
fn match_at(text: &str, chars: &[(usize, char)], start: usize, token: &[char]) -> Option<usize> {
    if start + token.len() > chars.len() {
        return None;
    }

    let matched = chars[start..start + token.len()]
        .iter()
        .zip(token)
        .all(|((_, a), b)| same_letter(*a, *b));
    if !matched {
        return None;
    }

    Some(chars.get(start + token.len()).map_or(text.len(), |(idx, _)| *idx))
}

fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn merge(mut ranges: Vec<Range<usize>>) -> Vec<Range<usize>> {
    ranges.sort_by_key(|range| (range.start, range.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

pub fn source_label(book_name: &str) -> String {
    book_name.replace('_', " ")
}

/// Missing and zero page numbers both read as `N/A`.
pub fn page_label(page_number: Option<i64>) -> String {
    match page_number {
        Some(page) if page != 0 => page.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn similarity_label(similarity: f64) -> String {
    format!("{:.1}%", similarity * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMatch {
    pub rank: usize,
    pub source: String,
    pub page: String,
    pub similarity: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedResults {
    NoResults {
        message: String,
        hint: String,
    },
    Results {
        summary: String,
        matches: Vec<RenderedMatch>,
    },
}

/// Renders in the order given; never re-sorts.
pub fn render_results(results: &[SearchResult], query: &str, highlighter: &Highlighter) -> RenderedResults {
    if results.is_empty() {
        return RenderedResults::NoResults {
            message: "No results found".to_string(),
            hint: "Try a different search query or adjust your filters".to_string(),
        };
    }

    let noun = if results.len() == 1 { "result" } else { "results" };
    let matches = results
        .iter()
        .enumerate()
        .map(|(idx, result)| RenderedMatch {
            rank: idx + 1,
            source: source_label(&result.book_name),
            page: page_label(result.page_number),
            similarity: similarity_label(result.similarity),
            text: highlighter.highlight(&result.chunk_text, query),
        })
        .collect();

    RenderedResults::Results {
        summary: format!("Found {} {} for \"{}\"", results.len(), noun, query),
        matches,
    }
}

impl fmt::Display for RenderedResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResults { message, hint } => write!(f, "{}\n{}", message, hint),
            Self::Results { summary, matches } => {
                write!(f, "{}", summary)?;
                for item in matches {
                    write!(
                        f,
                        "\n\n#{} {} | Page {} | {} match\n{}",
                        item.rank, item.source, item.page, item.similarity, item.text
                    )?;
                }
                Ok(())
            }
        }
    }
}
