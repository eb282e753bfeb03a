use skald_deck::{SlideLayout, SlideRecord, ValidationResult};

use crate::format::{has_breaking_marker, is_list_item};

/// Content shorter than this, or matching a placeholder token, is not
/// meaningful.
const MIN_CONTENT_CHARS: usize = 10;

const PLACEHOLDER_TOKENS: &[&str] = &["todo", "tbd", "...", "placeholder", "n/a"];

fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    trimmed.chars().count() < MIN_CONTENT_CHARS
        || PLACEHOLDER_TOKENS.contains(&trimmed.as_str())
}

/// A list item directly after a prose line, with no blank separator, is
/// malformed nesting in the target markup.
fn has_nested_list(text: &str) -> bool {
    let mut prev_prose = false;
    for line in text.lines() {
        let trimmed = line.trim_start();
        let is_list = is_list_item(trimmed);
        if is_list && prev_prose {
            return true;
        }
        prev_prose = !trimmed.is_empty() && !is_list && !trimmed.starts_with('#');
    }
    false
}

/// Inspect one formatted slide. Checks run in severity order; every
/// failure contributes an issue string, and `is_valid` is their
/// conjunction.
pub fn validate_slide(slide: &SlideRecord) -> ValidationResult {
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    // 1. Residual breaking markers
    if has_breaking_marker(&slide.content) {
        issues.push("content contains an unescaped alias/anchor marker".to_string());
    }
    if let Some(right) = &slide.right_content {
        if has_breaking_marker(right) {
            issues.push("right column contains an unescaped alias/anchor marker".to_string());
        }
    }

    // 2. Malformed block nesting
    if has_nested_list(&slide.content) {
        issues.push("a list is nested inside a prose paragraph".to_string());
    }

    // 3. Meaningful content
    if slide.title.trim().is_empty() {
        issues.push("title is blank".to_string());
    }
    if is_placeholder(&slide.content) {
        issues.push("content is blank or a placeholder".to_string());
    }

    // 4. Layout-specific rules
    if slide.layout == SlideLayout::TwoCols
        && slide
            .right_content
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty()
    {
        issues.push("two-cols layout requires right column content".to_string());
    }

    if slide.notes.is_none() {
        recommendations.push("consider adding speaker notes".to_string());
    }

    ValidationResult {
        is_valid: issues.is_empty(),
        issues,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(content: &str) -> SlideRecord {
        SlideRecord::new("A real title", content)
    }

    #[test]
    fn clean_slide_passes() {
        let result = validate_slide(&slide("A real paragraph about the work.\n\n- with a list"));
        assert!(result.is_valid, "issues: {:?}", result.issues);
    }

    #[test]
    fn residual_marker_fails() {
        let result = validate_slide(&slide("left a *stray marker here"));
        assert!(!result.is_valid);
        assert!(result.issues[0].contains("marker"));
    }

    #[test]
    fn escaped_marker_passes() {
        let result = validate_slide(&slide("a \\*stray marker, neutralized properly"));
        assert!(result.is_valid, "issues: {:?}", result.issues);
    }

    #[test]
    fn nested_list_fails() {
        let result = validate_slide(&slide("Some prose line\n- list without separation"));
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i.contains("nested")));
    }

    #[test]
    fn blank_title_fails() {
        let mut record = slide("A real paragraph about the work.");
        record.title = "  ".into();
        let result = validate_slide(&record);
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i.contains("title")));
    }

    #[test]
    fn placeholder_content_fails() {
        for bad in ["", "TODO", "tbd", "...", "short"] {
            let result = validate_slide(&slide(bad));
            assert!(!result.is_valid, "{bad:?} should fail");
        }
    }

    #[test]
    fn two_cols_requires_right_content() {
        let mut record = slide("A real paragraph about the work.");
        record.layout = SlideLayout::TwoCols;
        let result = validate_slide(&record);
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i.contains("right column")));

        record.right_content = Some("The other half of the story.".into());
        assert!(validate_slide(&record).is_valid);
    }

    #[test]
    fn issues_accumulate() {
        let mut record = slide("prose\n- nested *stray list");
        record.title = "".into();
        let result = validate_slide(&record);
        assert!(result.issues.len() >= 3, "issues: {:?}", result.issues);
    }

    #[test]
    fn missing_notes_is_advisory_only() {
        let result = validate_slide(&slide("A real paragraph about the work."));
        assert!(result.is_valid);
        assert!(!result.recommendations.is_empty());
    }
}
