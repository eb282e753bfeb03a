use std::sync::OnceLock;

use regex::Regex;
use skald_deck::SlideRecord;

// ── Breaking-pattern sanitization ────────────────────────────────────
//
// The target markup's configuration parser treats `*name` and `&name` at
// token start as alias/anchor directives; a stray marker leaking out of
// generated prose breaks the whole deck. Paired emphasis and list bullets
// are legitimate and must survive untouched.

/// True if `text` still contains an unescaped breaking marker.
pub fn has_breaking_marker(text: &str) -> bool {
    text.lines().any(|line| find_markers(line).next().is_some())
}

/// Escape stray `*`/`&` markers in markdown, preserving paired emphasis,
/// list bullets, and already-escaped markers. Idempotent.
pub fn sanitize_markup(text: &str) -> String {
    let lines: Vec<String> = text.lines().map(sanitize_line).collect();
    lines.join("\n")
}

/// Byte offsets of breaking markers in one line.
fn find_markers(line: &str) -> impl Iterator<Item = usize> + '_ {
    let chars: Vec<char> = line.chars().collect();
    let mut offsets = Vec::new();
    let mut byte = 0usize;

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '*' || ch == '&' {
            let at_token_start = i == 0 || chars[i - 1].is_whitespace();
            if at_token_start && is_breaking_at(&chars, i) {
                offsets.push(byte);
            }
        }
        byte += ch.len_utf8();
    }
    offsets.into_iter()
}

/// A marker at `i` breaks when an identifier follows immediately and then
/// whitespace or end-of-line. A `*` with a closing `*` later on the line is
/// assumed to be paired emphasis and left alone.
fn is_breaking_at(chars: &[char], i: usize) -> bool {
    let marker = chars[i];
    let mut j = i + 1;
    while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
        j += 1;
    }
    if j == i + 1 {
        return false; // no identifier: list bullet or lone marker
    }
    if j < chars.len() && !chars[j].is_whitespace() {
        return false; // identifier runs into punctuation (e.g. `&amp;`, `*word*`)
    }
    if marker == '*' && chars[j..].contains(&'*') {
        return false; // a closing marker exists: treat as paired emphasis
    }
    true
}

fn sanitize_line(line: &str) -> String {
    let offsets: Vec<usize> = find_markers(line).collect();
    if offsets.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + offsets.len());
    let mut next = 0usize;
    for (byte, ch) in line.char_indices() {
        if next < offsets.len() && byte == offsets[next] {
            out.push('\\');
            next += 1;
        }
        out.push(ch);
    }
    out
}

// ── Block normalization ──────────────────────────────────────────────

/// Bullet or ordered list item.
pub(crate) fn is_list_item(line: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s").expect("list item regex"));
    re.is_match(line)
}

#[derive(PartialEq, Clone, Copy)]
enum LineKind {
    Blank,
    List,
    Heading,
    Prose,
}

fn line_kind(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Heading;
    }
    if is_list_item(trimmed) {
        return LineKind::List;
    }
    LineKind::Prose
}

/// Separate block elements with blank lines and unwrap bold spans that
/// swallow a list marker (`**- x**` → `- **x**`). Lists must never sit
/// inside a prose paragraph.
pub fn normalize_blocks(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut prev = LineKind::Blank;

    for line in text.lines() {
        let line = unwrap_bold_list_item(line);
        let kind = line_kind(&line);
        let boundary = kind != prev
            && prev != LineKind::Blank
            && kind != LineKind::Blank
            && (kind != LineKind::Prose || prev != LineKind::Heading);
        if boundary {
            out.push(String::new());
        }
        prev = kind;
        out.push(line);
    }
    out.join("\n")
}

/// `**- item**` is a bold span around a list marker; rewrite it as a list
/// item with bold text.
fn unwrap_bold_list_item(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];
    for bullet in ["- ", "* ", "+ "] {
        let prefix = format!("**{bullet}");
        if let Some(rest) = trimmed.strip_prefix(&prefix) {
            let inner = rest.strip_suffix("**").unwrap_or(rest);
            return format!("{indent}{bullet}**{}**", inner.trim_end());
        }
    }
    line.to_string()
}

// ── Slide formatting ─────────────────────────────────────────────────

/// Format one slide: sanitize the markdown fields and normalize block
/// structure. Replacement, not mutation — the input is left untouched.
pub fn format_slide(slide: &SlideRecord) -> SlideRecord {
    let mut formatted = slide.clone();
    // Titles end up on a heading/metadata line: strip markers outright.
    formatted.title = slide.title.replace(['*', '\\'], "").trim().to_string();
    formatted.subtitle = slide
        .subtitle
        .as_deref()
        .map(|s| sanitize_markup(s).trim().to_string())
        .filter(|s| !s.is_empty());
    formatted.content = normalize_blocks(&sanitize_markup(&slide.content));
    formatted.right_content = slide
        .right_content
        .as_deref()
        .map(|s| normalize_blocks(&sanitize_markup(s)));
    // Notes live in an HTML comment: the only sequence that can break out
    // of it is the comment terminator.
    formatted.notes = slide.notes.as_deref().map(|n| n.replace("-->", "-- >"));
    formatted
}
