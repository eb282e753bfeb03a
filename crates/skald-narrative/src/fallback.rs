use skald_core::{Commit, CommitCategory};
use skald_deck::{SlideDeck, SlideLayout, SlideRecord};

use crate::style::CategoryCounts;

// ── Deterministic fallback deck ──────────────────────────────────────
//
// Total by construction: no external calls, succeeds for any non-empty
// range including a single commit. Used whole-deck when the capability is
// disabled or unavailable, and per-failure-boundary when upstream stages
// fail irrecoverably.

/// Build a complete deck from raw commit data alone.
pub fn render_fallback(commits: &[Commit]) -> SlideDeck {
    let counts = CategoryCounts::tally(commits);
    let mut deck = SlideDeck::new("Development Recap", "default");

    deck.slides.push(title_slide(commits));
    deck.slides.push(scope_slide(commits));
    deck.slides.push(journey_slide(commits));
    if counts.bugfix > 0 {
        deck.slides.push(challenges_slide(commits));
    }
    deck.slides.push(outcome_slide(commits, &counts));
    deck.slides.push(next_slide(&counts));

    deck
}

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// "Mar 1, 2026" when the timestamp parses as RFC 3339; the raw date prefix
/// otherwise.
fn display_date(commit: &Commit) -> String {
    match time::OffsetDateTime::parse(
        &commit.timestamp,
        &time::format_description::well_known::Rfc3339,
    ) {
        Ok(ts) => {
            let month = MONTHS[usize::from(u8::from(ts.month())) - 1];
            format!("{month} {}, {}", ts.day(), ts.year())
        }
        Err(_) => commit.date().to_string(),
    }
}

fn date_range(commits: &[Commit]) -> String {
    let first = commits.first().map(display_date).unwrap_or_default();
    let last = commits.last().map(display_date).unwrap_or_default();
    if first == last {
        first
    } else {
        format!("{first} to {last}")
    }
}

fn title_slide(commits: &[Commit]) -> SlideRecord {
    let n = commits.len();
    let content = if n == 1 {
        format!(
            "A focused update: 1 commit on {}.",
            date_range(commits)
        )
    } else {
        format!("{n} commits, {}.", date_range(commits))
    };
    SlideRecord::new("Development Recap", content)
        .with_layout(SlideLayout::Cover)
        .with_subtitle(date_range(commits))
}

fn scope_slide(commits: &[Commit]) -> SlideRecord {
    let files: usize = commits.iter().map(|c| c.stats.files_changed).sum();
    let insertions: usize = commits.iter().map(|c| c.stats.insertions).sum();
    let deletions: usize = commits.iter().map(|c| c.stats.deletions).sum();
    let mut authors: Vec<&str> = commits.iter().map(|c| c.author.as_str()).collect();
    authors.sort_unstable();
    authors.dedup();

    let content = format!(
        "- {} commits\n- {} file changes\n- {} lines added, {} removed\n- {} contributor{}",
        commits.len(),
        files,
        insertions,
        deletions,
        authors.len(),
        if authors.len() == 1 { "" } else { "s" },
    );
    SlideRecord::new("Scope", content)
}

/// Connective phrase by position in the range.
fn connective(index: usize, total: usize) -> &'static str {
    if index == 0 {
        "The work opened with"
    } else if index + 1 == total {
        "Most recently,"
    } else if index == 1 {
        "Building on that,"
    } else {
        "From there,"
    }
}

fn journey_slide(commits: &[Commit]) -> SlideRecord {
    let total = commits.len();
    let paragraphs: Vec<String> = commits
        .iter()
        .enumerate()
        .map(|(i, commit)| {
            format!(
                "{} {} ({}, {}).",
                connective(i, total),
                commit.subject(),
                commit.author,
                display_date(commit),
            )
        })
        .collect();
    SlideRecord::new("The Journey", paragraphs.join("\n\n"))
}

fn challenges_slide(commits: &[Commit]) -> SlideRecord {
    let fixes: Vec<String> = commits
        .iter()
        .filter(|c| c.category == CommitCategory::Bugfix)
        .map(|c| format!("- {}", c.subject()))
        .collect();
    let content = format!(
        "Not everything went smoothly. Along the way the team worked through:\n\n{}",
        fixes.join("\n")
    );
    SlideRecord::new("Challenges", content)
}

fn outcome_slide(commits: &[Commit], counts: &CategoryCounts) -> SlideRecord {
    let work: Vec<String> = counts
        .present()
        .into_iter()
        .map(|(label, count)| format!("- {count} {label}"))
        .collect();
    let files: usize = commits.iter().map(|c| c.stats.files_changed).sum();
    let content = format!(
        "What the range delivered:\n\n{}\n\nAcross {} file changes in total.",
        work.join("\n"),
        files,
    );
    SlideRecord::new("Outcome", content)
}

fn next_slide(counts: &CategoryCounts) -> SlideRecord {
    let content = match (counts.feature > 0, counts.bugfix > 0) {
        (true, true) => {
            "With new capability landed and the rough edges smoothed out, the next step is \
             building on this foundation."
        }
        (true, false) => {
            "With new capability landed cleanly, the next step is building on this foundation."
        }
        (false, true) => {
            "With the rough edges smoothed out, the codebase is steadier — a good base for \
             the next round of work."
        }
        (false, false) => "Steady groundwork this round; the next features can build on it.",
    };
    SlideRecord::new("What's Next", content)
}
