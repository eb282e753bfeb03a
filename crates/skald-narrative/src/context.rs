use std::collections::VecDeque;

use skald_core::{Commit, CommitCategory};

/// How many prior segment summaries the continuity digest keeps.
const CONTEXT_WINDOW: usize = 2;

/// How much accepted content each summary carries forward.
const EXCERPT_CHARS: usize = 200;

/// Digest of one accepted segment, carried forward for continuity.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub title: String,
    pub excerpt: String,
}

/// Narrative state threaded through one deck's generation. Owned solely by
/// the orchestrator and discarded when the deck completes.
#[derive(Debug, Clone)]
pub struct NarrativeContext {
    pub overall_theme: String,
    previous: VecDeque<SegmentSummary>,
    pub segment_index: usize,
    pub total_segments: usize,
}

impl NarrativeContext {
    pub fn new(overall_theme: String, total_segments: usize) -> Self {
        NarrativeContext {
            overall_theme,
            previous: VecDeque::new(),
            segment_index: 0,
            total_segments,
        }
    }

    pub fn is_first(&self) -> bool {
        self.segment_index == 0
    }

    pub fn is_last(&self) -> bool {
        self.segment_index + 1 == self.total_segments
    }

    /// Move to the given segment position.
    pub fn advance(&mut self, segment_index: usize) {
        self.segment_index = segment_index;
    }

    /// Record an accepted segment. Keeps at most two entries, evicting the
    /// oldest.
    pub fn push_summary(&mut self, title: &str, content: &str) {
        let excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
        self.previous.push_back(SegmentSummary {
            title: title.to_string(),
            excerpt,
        });
        while self.previous.len() > CONTEXT_WINDOW {
            self.previous.pop_front();
        }
    }

    pub fn previous_summaries(&self) -> impl Iterator<Item = &SegmentSummary> {
        self.previous.iter()
    }
}

/// Derive a one-line theme for the whole deck from the range: dominant
/// category plus commit count.
pub fn derive_theme(commits: &[Commit]) -> String {
    let n = commits.len();
    let mut counts: Vec<(CommitCategory, usize)> = Vec::new();
    for commit in commits {
        match counts.iter_mut().find(|(c, _)| *c == commit.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((commit.category, 1)),
        }
    }
    let dominant = counts.iter().max_by_key(|(_, count)| *count);

    match dominant {
        Some((category, _)) if n == 1 => {
            format!("a focused update: 1 {} commit", category.label())
        }
        Some((category, count)) if *count * 2 >= n => {
            format!("{n} commits, mostly {} work", category.label())
        }
        Some(_) => format!("{n} commits of mixed work"),
        None => "an empty range".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_core::CommitStats;

    fn commit(subject: &str) -> Commit {
        Commit::new(
            "id".into(),
            subject.into(),
            "Ada".into(),
            "2026-03-01T10:00:00Z".into(),
            None,
            CommitStats::default(),
            vec![],
        )
    }

    #[test]
    fn ring_buffer_keeps_two() {
        let mut ctx = NarrativeContext::new("theme".into(), 5);
        ctx.push_summary("one", "a");
        ctx.push_summary("two", "b");
        ctx.push_summary("three", "c");

        let titles: Vec<_> = ctx.previous_summaries().map(|s| s.title.clone()).collect();
        assert_eq!(titles, vec!["two", "three"]);
    }

    #[test]
    fn excerpt_is_truncated() {
        let mut ctx = NarrativeContext::new("theme".into(), 5);
        let long = "x".repeat(500);
        ctx.push_summary("t", &long);
        let summary = ctx.previous_summaries().next().unwrap();
        assert_eq!(summary.excerpt.chars().count(), 200);
    }

    #[test]
    fn first_and_last_flags() {
        let mut ctx = NarrativeContext::new("theme".into(), 3);
        assert!(ctx.is_first());
        assert!(!ctx.is_last());
        ctx.advance(2);
        assert!(!ctx.is_first());
        assert!(ctx.is_last());
    }

    #[test]
    fn theme_reports_dominant_category() {
        let commits = vec![
            commit("feat: a"),
            commit("feat: b"),
            commit("fix: c"),
        ];
        let theme = derive_theme(&commits);
        assert!(theme.contains("3 commits"));
        assert!(theme.contains("feature"));
    }

    #[test]
    fn theme_for_single_commit_is_focused() {
        let commits = vec![commit("fix: c")];
        let theme = derive_theme(&commits);
        assert!(theme.contains("focused"));
        assert!(theme.contains('1'));
    }
}
