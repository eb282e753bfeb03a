use anyhow::{bail, Result};
use skald_core::Commit;
use skald_deck::{SlideDeck, SlideLayout, SlideRecord};
use skald_narrative::{
    build_prompt, derive_theme, plan_segments, NarrativeContext, NarrativeSegment, SegmentRole,
    StyleOptions, StyleRegistry, StyleTemplate,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::capability::{SlideCapability, SlideRequest};
use crate::state::{SegmentState, SegmentStatus};

/// Bounded retry discipline: per segment, at most this many capability
/// attempts before placeholder substitution. Retries are immediate — no
/// backoff.
pub const MAX_ATTEMPTS: u32 = 3;

/// Drives generate → format → validate per segment, accumulating narrative
/// context, and resolves exhausted segments with deterministic placeholders.
/// One segment's failure never aborts the deck.
pub struct Orchestrator<'a> {
    capability: &'a dyn SlideCapability,
    style: &'a StyleTemplate,
    options: StyleOptions,
    report: bool,
}

impl<'a> Orchestrator<'a> {
    /// Style resolution happens here, against the injected registry — not
    /// against any ambient state.
    pub fn new(
        capability: &'a dyn SlideCapability,
        styles: &'a StyleRegistry,
        style_name: &str,
        options: StyleOptions,
    ) -> Result<Self> {
        let style = styles.get(style_name).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown style \"{style_name}\" (available: {})",
                styles.names().collect::<Vec<_>>().join(", ")
            )
        })?;
        Ok(Orchestrator {
            capability,
            style,
            options,
            report: true,
        })
    }

    /// Silence per-segment console reporting (tests).
    pub fn with_report(mut self, report: bool) -> Self {
        self.report = report;
        self
    }

    /// Generate the whole deck, segment by segment, sequentially — each
    /// segment's prompt depends on the finalized output of prior segments,
    /// so there is no fan-out.
    pub async fn run(
        &self,
        commits: &[Commit],
        deck_title: &str,
        theme: &str,
        cancel: &CancellationToken,
    ) -> Result<SlideDeck> {
        let segments = plan_segments(commits);
        let total = segments.len();
        let mut context = NarrativeContext::new(derive_theme(commits), total);
        let mut deck = SlideDeck::new(deck_title, theme);

        for (i, segment) in segments.iter().enumerate() {
            // Stop between segments, never mid-call. No partial deck.
            if cancel.is_cancelled() {
                bail!("generation cancelled before segment {} of {total}", i + 1);
            }
            context.advance(i);
            if self.report {
                println!(
                    "▶ [{}/{total}] {} slide ({})",
                    i + 1,
                    segment.role.as_str(),
                    segment.focus.as_str()
                );
            }

            let (slide, state) = self.process_segment(segment, &context).await?;
            if self.report {
                if state.placeholder {
                    println!(
                        "  ✗ placeholder after {} attempts: {}",
                        state.attempts,
                        state.last_issues.join("; ")
                    );
                } else {
                    println!("  ✓ accepted (attempt {})", state.attempts);
                }
            }

            context.push_summary(&slide.title, &slide.content);
            deck.slides.push(slide);
        }

        Ok(deck)
    }

    /// One segment's trip through the state machine. Always resolves to a
    /// slide: a validated one, or the role-specific placeholder.
    async fn process_segment(
        &self,
        segment: &NarrativeSegment,
        context: &NarrativeContext,
    ) -> Result<(SlideRecord, SegmentState)> {
        let mut state = SegmentState::new(context.segment_index);
        // Retries re-call the capability with the same narrative context:
        // nothing was accepted yet, so there is nothing to roll back.
        let request = SlideRequest {
            prompt: build_prompt(segment, context, self.style, &self.options),
        };

        loop {
            state.attempts += 1;
            state.transition(SegmentStatus::Generating)?;

            let generated = match self.capability.generate(&request).await {
                Ok(slide) => slide,
                Err(err) => {
                    // Straight to retry — no formatting/validating consumed.
                    debug!(attempt = state.attempts, %err, "generation failed");
                    state.last_issues = vec![err.to_string()];
                    if self.exhaust_or_retry(&mut state)? {
                        continue;
                    }
                    return Ok(self.substitute_placeholder(segment, state));
                }
            };

            state.transition(SegmentStatus::Formatting)?;
            let formatted = match self.capability.format(&generated) {
                Ok(slide) => slide,
                Err(err) => {
                    state.last_issues = vec![err.to_string()];
                    if self.exhaust_or_retry(&mut state)? {
                        continue;
                    }
                    return Ok(self.substitute_placeholder(segment, state));
                }
            };

            state.transition(SegmentStatus::Validating)?;
            match self.capability.validate(&formatted) {
                Ok(result) if result.is_valid => {
                    state.transition(SegmentStatus::Accepted)?;
                    return Ok((formatted, state));
                }
                Ok(result) => {
                    debug!(attempt = state.attempts, issues = ?result.issues, "validation failed");
                    state.last_issues = result.issues;
                }
                Err(err) => {
                    state.last_issues = vec![err.to_string()];
                }
            }
            if self.exhaust_or_retry(&mut state)? {
                continue;
            }
            return Ok(self.substitute_placeholder(segment, state));
        }
    }

    /// Move to Retrying; true means another attempt is allowed, false means
    /// the bound is exhausted and the state is Failed.
    fn exhaust_or_retry(&self, state: &mut SegmentState) -> Result<bool> {
        state.transition(SegmentStatus::Retrying)?;
        if state.attempts >= MAX_ATTEMPTS {
            state.transition(SegmentStatus::Failed)?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Role-specific deterministic placeholder. Total — never retried.
    fn substitute_placeholder(
        &self,
        segment: &NarrativeSegment,
        mut state: SegmentState,
    ) -> (SlideRecord, SegmentState) {
        state.placeholder = true;
        let slide = placeholder_slide(segment);
        (slide, state)
    }
}

fn placeholder_slide(segment: &NarrativeSegment) -> SlideRecord {
    match segment.role {
        SegmentRole::Title => SlideRecord::new(
            "Overview",
            "A walk through this stretch of the project's history.",
        )
        .with_layout(SlideLayout::Cover),
        SegmentRole::Conclusion => SlideRecord::new(
            "Summary",
            "That concludes this stretch of work. Questions welcome.",
        ),
        SegmentRole::Content => {
            let n = segment.commits.len();
            let noun = if n == 1 { "commit" } else { "commits" };
            SlideRecord::new(
                "Development Progress",
                format!("This part of the journey covered {n} {noun}."),
            )
        }
    }
}
