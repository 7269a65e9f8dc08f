//! Protected regions: fenced code, tables, inline code and any caller-found
//! blocks that rules must not touch.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static RE_INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"``[^\n]+?``|`[^`\n]+`").unwrap());
static RE_TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*\|?[ \t]*:?-{3,}:?[ \t]*(?:\|[ \t]*:?-{3,}:?[ \t]*)*\|?[ \t]*$").unwrap()
});
static RE_HTML_TABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<table\b.*?</table>").unwrap());

/// Byte ranges of a text that rules skip over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shields {
    ranges: Vec<Range<usize>>,
}

impl Shields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, range: Range<usize>) {
        if range.start < range.end {
            self.ranges.push(range);
        }
    }

    pub fn extend(&mut self, ranges: impl IntoIterator<Item = Range<usize>>) {
        for r in ranges {
            self.push(r);
        }
    }

    pub fn with(mut self, ranges: impl IntoIterator<Item = Range<usize>>) -> Self {
        self.extend(ranges);
        self
    }

    /// Shield every match of `re` in `text`.
    pub fn with_matches(self, re: &Regex, text: &str) -> Self {
        self.with(re.find_iter(text).map(|m| m.range()))
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(&pos))
    }

    /// Whether `range` touches a protected byte. An empty range counts when
    /// its position is protected.
    pub fn overlaps(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return self.contains(range.start);
        }
        self.ranges.iter().any(|r| r.start < range.end && range.start < r.end)
    }
}

/// Byte offsets of each line start, paired with the line (newline included).
pub fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |line| {
        let start = offset;
        offset += line.len();
        (start, line)
    })
}

fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let run = trimmed.chars().take_while(|c| *c == ch).count();
    (run >= 3).then_some((ch, run))
}

/// Fenced code blocks, fences included. An unclosed fence runs to the end.
pub fn fenced_code_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<(usize, char, usize)> = None;
    for (start, line) in lines_with_offsets(text) {
        let marker = fence_marker(line);
        match (open, marker) {
            (None, Some((ch, len))) => open = Some((start, ch, len)),
            (Some((begin, ch, len)), Some((c, l))) if c == ch && l >= len && line.trim().chars().all(|x| x == ch) => {
                ranges.push(begin..start + line.len());
                open = None;
            }
            _ => {}
        }
    }
    if let Some((begin, _, _)) = open {
        ranges.push(begin..text.len());
    }
    ranges
}

/// Inline code spans.
pub fn inline_code_ranges(text: &str) -> Vec<Range<usize>> {
    RE_INLINE_CODE.find_iter(text).map(|m| m.range()).collect()
}

/// Pipe tables (a run of `|` lines with a separator row) and HTML tables.
pub fn table_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut block: Option<(usize, usize, bool)> = None;
    for (start, line) in lines_with_offsets(text) {
        let body = line.trim_end_matches(['\n', '\r']);
        if body.contains('|') && !body.trim().is_empty() {
            let is_sep = RE_TABLE_SEPARATOR.is_match(body);
            block = Some(match block {
                Some((b, _, sep)) => (b, start + line.len(), sep || is_sep),
                None => (start, start + line.len(), is_sep),
            });
        } else if let Some((b, e, true)) = block.take() {
            ranges.push(b..e);
        }
    }
    if let Some((b, e, true)) = block {
        ranges.push(b..e);
    }
    ranges.extend(RE_HTML_TABLE.find_iter(text).map(|m| m.range()));
    ranges
}

/// Fenced code plus tables: the regions structural cleanup never edits.
pub fn code_and_tables(text: &str) -> Shields {
    Shields::new().with(fenced_code_ranges(text)).with(table_ranges(text))
}
