use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use skald_core::{Commit, CommitCategory};

// ── Style options ────────────────────────────────────────────────────

/// Inline presentation modifiers, passed through from the CLI.
#[derive(Debug, Clone, Default)]
pub struct StyleOptions {
    pub focus: Option<String>,
    pub audience: Option<String>,
    pub deep_dive: bool,
    pub metrics: bool,
    pub challenges: bool,
    pub team_size: Option<u32>,
}

// ── Categorized work ─────────────────────────────────────────────────

/// Per-category commit counts for a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub feature: usize,
    pub bugfix: usize,
    pub docs: usize,
    pub test: usize,
    pub refactor: usize,
    pub config: usize,
    pub general: usize,
}

impl CategoryCounts {
    pub fn tally(commits: &[Commit]) -> Self {
        let mut counts = CategoryCounts::default();
        for commit in commits {
            match commit.category {
                CommitCategory::Feature => counts.feature += 1,
                CommitCategory::Bugfix => counts.bugfix += 1,
                CommitCategory::Docs => counts.docs += 1,
                CommitCategory::Test => counts.test += 1,
                CommitCategory::Refactor => counts.refactor += 1,
                CommitCategory::Config => counts.config += 1,
                CommitCategory::General => counts.general += 1,
            }
        }
        counts
    }

    /// Non-zero counts as "(label, count)" pairs, in a fixed order.
    pub fn present(&self) -> Vec<(&'static str, usize)> {
        [
            ("feature", self.feature),
            ("bugfix", self.bugfix),
            ("docs", self.docs),
            ("test", self.test),
            ("refactor", self.refactor),
            ("config", self.config),
            ("general", self.general),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

// ── Commit digest ────────────────────────────────────────────────────

/// Compact per-commit digest lines embedded into prompts: subject, author,
/// date, and change stats.
pub fn commit_digest(commits: &[Commit]) -> String {
    let mut lines = Vec::with_capacity(commits.len());
    for commit in commits {
        lines.push(format!(
            "- [{}] {} ({}, {}; +{} -{} across {} files)",
            commit.category.label(),
            commit.subject(),
            commit.author,
            commit.date(),
            commit.stats.insertions,
            commit.stats.deletions,
            commit.stats.files_changed,
        ));
    }
    lines.join("\n")
}

// ── Templates ────────────────────────────────────────────────────────

/// Everything a style template may draw on.
pub struct StyleInput<'a> {
    pub theme: &'a str,
    pub digest: &'a str,
    pub counts: &'a CategoryCounts,
    pub options: &'a StyleOptions,
}

/// A custom style loaded from a YAML file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CustomStyle {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub tone: Option<String>,
}

impl CustomStyle {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let style: CustomStyle = serde_yaml::from_str(&content)?;
        if style.name.trim().is_empty() {
            anyhow::bail!("custom style at {} has an empty name", path.display());
        }
        Ok(style)
    }
}

/// One named prompt style. Built-ins plus file-loaded customs.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleTemplate {
    Technical,
    Story,
    Retro,
    Custom(CustomStyle),
}

impl StyleTemplate {
    /// Render the style preamble for one generation request.
    pub fn render(&self, input: &StyleInput) -> String {
        let mut out = String::new();
        match self {
            StyleTemplate::Technical => {
                out.push_str(
                    "You are writing a concise, technically precise slide for a development \
                     recap presentation. Prefer concrete detail over enthusiasm.\n",
                );
            }
            StyleTemplate::Story => {
                out.push_str(
                    "You are telling the story of a development effort as a narrative arc. \
                     Write the slide with momentum and plain language.\n",
                );
            }
            StyleTemplate::Retro => {
                out.push_str(
                    "You are preparing a team retrospective slide: honest about setbacks, \
                     specific about what changed, forward-looking in tone.\n",
                );
            }
            StyleTemplate::Custom(custom) => {
                out.push_str(custom.instructions.trim());
                out.push('\n');
                if let Some(tone) = &custom.tone {
                    out.push_str(&format!("Tone: {tone}\n"));
                }
            }
        }

        out.push_str(&format!("\nOverall theme: {}\n", input.theme));

        let work: Vec<String> = input
            .counts
            .present()
            .into_iter()
            .map(|(label, count)| format!("{count} {label}"))
            .collect();
        if !work.is_empty() {
            out.push_str(&format!("Work in this range: {}\n", work.join(", ")));
        }

        if !input.digest.is_empty() {
            out.push_str("\nCommits in this segment:\n");
            out.push_str(input.digest);
            out.push('\n');
        }

        let opts = input.options;
        if let Some(focus) = &opts.focus {
            out.push_str(&format!("Emphasize: {focus}\n"));
        }
        if let Some(audience) = &opts.audience {
            out.push_str(&format!("Audience: {audience}\n"));
        }
        if opts.deep_dive {
            out.push_str("Go deeper on implementation detail than usual.\n");
        }
        if opts.metrics {
            out.push_str("Include the concrete change numbers (files, insertions, deletions).\n");
        }
        if opts.challenges {
            out.push_str("Call out difficulties and how they were resolved.\n");
        }
        if let Some(team_size) = opts.team_size {
            out.push_str(&format!("This was a team of {team_size}.\n"));
        }

        out
    }
}

// ── Registry ─────────────────────────────────────────────────────────

/// Immutable name → template mapping, built once and injected into the
/// orchestrator at construction.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: BTreeMap<String, StyleTemplate>,
}

pub const DEFAULT_STYLE: &str = "technical";

impl StyleRegistry {
    /// The built-in presets.
    pub fn builtin() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert("technical".to_string(), StyleTemplate::Technical);
        styles.insert("story".to_string(), StyleTemplate::Story);
        styles.insert("retro".to_string(), StyleTemplate::Retro);
        StyleRegistry { styles }
    }

    /// Add a custom style under its own name. Later insertions shadow
    /// earlier ones, so a custom style may override a preset.
    pub fn with_custom(mut self, custom: CustomStyle) -> Self {
        self.styles
            .insert(custom.name.clone(), StyleTemplate::Custom(custom));
        self
    }

    pub fn get(&self, name: &str) -> Option<&StyleTemplate> {
        self.styles.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(|s| s.as_str())
    }
}
