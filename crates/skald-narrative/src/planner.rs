use skald_core::Commit;
use tracing::debug;

// ── Segment types ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Title,
    Content,
    Conclusion,
}

impl SegmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentRole::Title => "title",
            SegmentRole::Content => "content",
            SegmentRole::Conclusion => "conclusion",
        }
    }
}

/// Intent label for a segment, from a small closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusLabel {
    Opening,
    EarlyDevelopment,
    DevelopmentProgress,
    RecentChanges,
    Summary,
}

impl FocusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusLabel::Opening => "opening",
            FocusLabel::EarlyDevelopment => "early-development",
            FocusLabel::DevelopmentProgress => "development-progress",
            FocusLabel::RecentChanges => "recent-changes",
            FocusLabel::Summary => "summary",
        }
    }
}

/// One planned unit of the presentation — maps to exactly one final slide.
#[derive(Debug, Clone)]
pub struct NarrativeSegment {
    pub role: SegmentRole,
    pub focus: FocusLabel,
    /// Contiguous slice of the range. Empty for title/conclusion, and for
    /// trailing content segments of very small ranges.
    pub commits: Vec<Commit>,
}

// ── Planning ──

/// Target slide count: clamp(ceil(n/3), 5, 8).
pub fn target_slide_count(commit_count: usize) -> usize {
    commit_count.div_ceil(3).clamp(5, 8)
}

/// Partition an ordered commit range into title + content segments +
/// conclusion. Content slices are contiguous, non-overlapping, and their
/// concatenation equals the input order.
pub fn plan_segments(commits: &[Commit]) -> Vec<NarrativeSegment> {
    let n = commits.len();
    let total = target_slide_count(n);
    // Title and conclusion are always present; at least one content segment
    // absorbs the whole range even when the target is tiny.
    let content_count = total.saturating_sub(2).max(1);
    let slice_size = n.div_ceil(content_count).max(1);
    debug!(commits = n, segments = total, slice_size, "planned narrative");

    let mut segments = Vec::with_capacity(content_count + 2);
    segments.push(NarrativeSegment {
        role: SegmentRole::Title,
        focus: FocusLabel::Opening,
        commits: Vec::new(),
    });

    for i in 0..content_count {
        let start = (i * slice_size).min(n);
        let end = ((i + 1) * slice_size).min(n);
        let focus = if i == 0 {
            FocusLabel::EarlyDevelopment
        } else if i == content_count - 1 {
            FocusLabel::RecentChanges
        } else {
            FocusLabel::DevelopmentProgress
        };
        segments.push(NarrativeSegment {
            role: SegmentRole::Content,
            focus,
            commits: commits[start..end].to_vec(),
        });
    }

    segments.push(NarrativeSegment {
        role: SegmentRole::Conclusion,
        focus: FocusLabel::Summary,
        commits: Vec::new(),
    });

    segments
}
