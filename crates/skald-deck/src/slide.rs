use serde::{Deserialize, Serialize};

/// Slide layout, matching the target markup format's layout names.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SlideLayout {
    #[default]
    Default,
    Center,
    TwoCols,
    Cover,
}

impl SlideLayout {
    /// Layout name as written in slide frontmatter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideLayout::Default => "default",
            SlideLayout::Center => "center",
            SlideLayout::TwoCols => "two-cols",
            SlideLayout::Cover => "cover",
        }
    }
}

/// One slide. Produced by the content generator, refined by the formatter
/// (treated as replacement, not in-place mutation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlideRecord {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub layout: SlideLayout,
    pub content: String,
    /// Right column, required only when layout is two-cols.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_content: Option<String>,
    /// Speaker notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SlideRecord {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        SlideRecord {
            title: title.into(),
            subtitle: None,
            layout: SlideLayout::Default,
            content: content.into(),
            right_content: None,
            notes: None,
        }
    }

    pub fn with_layout(mut self, layout: SlideLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Outcome of validating one formatted slide. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<String>,
    /// Advisory only — never blocks acceptance.
    pub recommendations: Vec<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult {
            is_valid: true,
            ..Default::default()
        }
    }
}

/// Terminal artifact: ordered slides plus top-level metadata. Serialized
/// once and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideDeck {
    pub title: String,
    pub theme: String,
    pub slides: Vec<SlideRecord>,
}

impl SlideDeck {
    pub fn new(title: impl Into<String>, theme: impl Into<String>) -> Self {
        SlideDeck {
            title: title.into(),
            theme: theme.into(),
            slides: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_names() {
        assert_eq!(SlideLayout::TwoCols.as_str(), "two-cols");
        assert_eq!(SlideLayout::Default.as_str(), "default");
    }

    #[test]
    fn record_roundtrip_json() {
        let slide = SlideRecord::new("Title", "body")
            .with_layout(SlideLayout::Center)
            .with_notes("say hello");
        let json = serde_json::to_string(&slide).unwrap();
        let back: SlideRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slide);
    }

    #[test]
    fn layout_deserializes_kebab_case() {
        let slide: SlideRecord = serde_json::from_str(
            r#"{"title":"T","layout":"two-cols","content":"a","right_content":"b"}"#,
        )
        .unwrap();
        assert_eq!(slide.layout, SlideLayout::TwoCols);
    }

    #[test]
    fn missing_layout_defaults() {
        let slide: SlideRecord =
            serde_json::from_str(r#"{"title":"T","content":"a"}"#).unwrap();
        assert_eq!(slide.layout, SlideLayout::Default);
    }
}
