use serde::{Deserialize, Serialize};

use crate::classify::classify_commit;

/// Commit category, derived from the subject line and changed files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CommitCategory {
    Feature,
    Bugfix,
    Docs,
    Test,
    Refactor,
    Config,
    General,
}

impl CommitCategory {
    /// Human-readable label used in rendered decks.
    pub fn label(&self) -> &'static str {
        match self {
            CommitCategory::Feature => "feature",
            CommitCategory::Bugfix => "bugfix",
            CommitCategory::Docs => "docs",
            CommitCategory::Test => "test",
            CommitCategory::Refactor => "refactor",
            CommitCategory::Config => "config",
            CommitCategory::General => "general",
        }
    }
}

/// How a file changed relative to the commit's first parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

/// Coarse file kind, by path and extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Code,
    Config,
    Test,
    Doc,
    Other,
}

/// One changed file within a commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileChange {
    pub path: String,
    pub status: FileStatus,
    pub file_type: FileType,
}

/// Aggregate change stats for one commit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// A fully enriched commit. Constructed once by the repository reader,
/// never mutated afterwards. `category` is derived, not settable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    /// RFC 3339 author timestamp as read from the log.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub stats: CommitStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_changes: Vec<FileChange>,
    pub category: CommitCategory,
}

impl Commit {
    /// Build an enriched commit, deriving the category from subject + files.
    pub fn new(
        id: String,
        message: String,
        author: String,
        timestamp: String,
        body: Option<String>,
        stats: CommitStats,
        file_changes: Vec<FileChange>,
    ) -> Self {
        let category = classify_commit(&message, &file_changes);
        Commit {
            id,
            message,
            author,
            timestamp,
            body,
            stats,
            file_changes,
            category,
        }
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Abbreviated id for display (7 chars, like git).
    pub fn short_id(&self) -> &str {
        let end = self.id.len().min(7);
        &self.id[..end]
    }

    /// Date portion (YYYY-MM-DD) of the timestamp.
    pub fn date(&self) -> &str {
        let end = self.timestamp.len().min(10);
        &self.timestamp[..end]
    }
}

/// Cheap commit listing entry for interactive range selection — no enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSummary {
    pub id: String,
    pub subject: String,
    pub author: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str, file_type: FileType) -> FileChange {
        FileChange {
            path: path.into(),
            status: FileStatus::Modified,
            file_type,
        }
    }

    #[test]
    fn commit_derives_category() {
        let c = Commit::new(
            "abc123def456".into(),
            "feat: add login".into(),
            "Ada".into(),
            "2026-03-01T10:00:00Z".into(),
            None,
            CommitStats::default(),
            vec![change("src/login.rs", FileType::Code)],
        );
        assert_eq!(c.category, CommitCategory::Feature);
    }

    #[test]
    fn subject_is_first_line() {
        let c = Commit::new(
            "abc".into(),
            "fix: crash\n\nlong body here".into(),
            "Ada".into(),
            "2026-03-01T10:00:00Z".into(),
            Some("long body here".into()),
            CommitStats::default(),
            vec![],
        );
        assert_eq!(c.subject(), "fix: crash");
    }

    #[test]
    fn short_id_truncates() {
        let c = Commit::new(
            "abcdef0123456789".into(),
            "x".into(),
            "Ada".into(),
            "2026-03-01T10:00:00Z".into(),
            None,
            CommitStats::default(),
            vec![],
        );
        assert_eq!(c.short_id(), "abcdef0");
    }

    #[test]
    fn date_is_prefix() {
        let c = Commit::new(
            "abc".into(),
            "x".into(),
            "Ada".into(),
            "2026-03-01T10:00:00Z".into(),
            None,
            CommitStats::default(),
            vec![],
        );
        assert_eq!(c.date(), "2026-03-01");
    }
}
