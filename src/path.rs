//! Attribute path decomposition.
//!
//! Documentation names nested fields in two notations:
//! - bracket form: `configuration[urls][streaming]`, `alerts[admin.sign_up]`, `media_ids[]`
//! - dot form: `poll.options[].title`, `account.fields[]`
//!
//! Bracket contents are opaque (dots inside never split). `[]` marks the
//! segment before it as an array. Anything that cannot be parsed becomes one
//! literal segment rather than an error.
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    segments: Vec<String>,
    /// Indices into `segments` whose schema is an array.
    array_markers: BTreeSet<usize>,
}

impl AttributePath {
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        let path = if split_top_level(name).len() > 1 {
            parse_dotted(name)
        } else if name.contains('[') {
            parse_bracketed(name)
        } else {
            return Self::flat(name);
        };
        if path.is_empty() { Self::flat(name) } else { path }
    }

    pub fn flat(name: &str) -> Self {
        Self { segments: vec![name.to_string()], array_markers: BTreeSet::new() }
    }

    pub fn segments(&self) -> &[String] { &self.segments }

    pub fn len(&self) -> usize { self.segments.len() }

    pub fn is_empty(&self) -> bool { self.segments.is_empty() }

    /// One segment, no nesting (it may still be marked as an array).
    pub fn is_direct(&self) -> bool { self.segments.len() == 1 }

    pub fn is_array_at(&self, index: usize) -> bool { self.array_markers.contains(&index) }

    pub fn array_markers(&self) -> impl Iterator<Item = usize> + '_ { self.array_markers.iter().copied() }

    pub fn head(&self) -> &str { self.segments.first().map(String::as_str).unwrap_or("") }

    pub fn last(&self) -> &str { self.segments.last().map(String::as_str).unwrap_or("") }

    /// Drop the first segment, shifting markers down.
    pub fn strip_head(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
            array_markers: self.array_markers.iter().filter(|&&i| i > 0).map(|i| i - 1).collect(),
        }
    }

    /// Split off the longest array-marked prefix that still has segments after it.
    ///
    /// `poll.options[].title` → (`["poll", "options"]`, `title`). The tail never
    /// carries a marker except possibly on its own last segment.
    pub fn array_prefix(&self) -> Option<(Vec<String>, AttributePath)> {
        let last = self.segments.len().checked_sub(1)?;
        let marker = self.array_markers.iter().copied().filter(|&i| i < last).max()?;
        let prefix = self.segments[..=marker].to_vec();
        let tail = Self {
            segments: self.segments[marker + 1..].to_vec(),
            array_markers: self.array_markers.iter().filter(|&&i| i > marker).map(|i| i - marker - 1).collect(),
        };
        Some((prefix, tail))
    }

    fn empty() -> Self {
        Self { segments: Vec::new(), array_markers: BTreeSet::new() }
    }

    fn append(&mut self, other: AttributePath) {
        let offset = self.segments.len();
        self.array_markers.extend(other.array_markers.iter().map(|i| i + offset));
        self.segments.extend(other.segments);
    }

    fn push(&mut self, segment: &str) {
        let segment = segment.trim();
        if !segment.is_empty() {
            self.segments.push(segment.to_string());
        }
    }

    fn mark_last_as_array(&mut self) {
        if let Some(last) = self.segments.len().checked_sub(1) {
            self.array_markers.insert(last);
        }
    }
}

fn parse_bracketed(name: &str) -> AttributePath {
    let mut path = AttributePath::empty();
    let open = name.find('[').unwrap_or(name.len());
    path.push(&name[..open]);

    let rest = &name[open..];
    let mut depth = 0usize;
    let mut start = 0usize; // byte offset of the current segment body
    for (i, c) in rest.char_indices() {
        match c {
            '[' => {
                if depth == 0 { start = i + 1; }
                depth += 1;
            }
            ']' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let body = &rest[start..i];
                    if body.is_empty() { path.mark_last_as_array(); } else { path.push(body); }
                    start = i + 1;
                }
            }
            _ if depth == 0 => {
                // text outside brackets: keep the remainder as one literal
                path.push(&rest[i..]);
                return path;
            }
            _ => {}
        }
    }
    if depth > 0 {
        // unbalanced: everything after the dangling `[` is one literal
        path.push(&rest[start..]);
    }
    path
}

/// Split on top-level dots; dots inside brackets belong to the bracket body.
fn split_top_level(name: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in name.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                pieces.push(&name[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&name[start..]);
    pieces
}

fn parse_dotted(name: &str) -> AttributePath {
    let mut path = AttributePath::empty();
    for piece in split_top_level(name) {
        if piece.contains('[') {
            path.append(parse_bracketed(piece));
        } else {
            path.push(piece);
        }
    }
    path
}
