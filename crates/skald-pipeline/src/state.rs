use anyhow::{bail, Result};

// ── Segment status ──

/// Per-segment pipeline state. Generation errors skip straight to Retrying
/// without consuming the Formatting/Validating steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStatus {
    Pending,
    Generating,
    Formatting,
    Validating,
    Retrying,
    Accepted,
    Failed,
}

// ── Valid transitions ──

const VALID_TRANSITIONS: &[(SegmentStatus, &[SegmentStatus])] = &[
    (SegmentStatus::Pending, &[SegmentStatus::Generating]),
    (
        SegmentStatus::Generating,
        &[SegmentStatus::Formatting, SegmentStatus::Retrying],
    ),
    (
        SegmentStatus::Formatting,
        &[SegmentStatus::Validating, SegmentStatus::Retrying],
    ),
    (
        SegmentStatus::Validating,
        &[SegmentStatus::Accepted, SegmentStatus::Retrying],
    ),
    (
        SegmentStatus::Retrying,
        &[SegmentStatus::Generating, SegmentStatus::Failed],
    ),
    // Accepted is terminal. Failed resolves outside the machine via
    // placeholder substitution, which never re-enters it.
];

fn is_valid_transition(from: SegmentStatus, to: SegmentStatus) -> bool {
    VALID_TRANSITIONS
        .iter()
        .any(|(f, targets)| *f == from && targets.contains(&to))
}

// ── Segment state ──

/// Mutable state for one segment's trip through the pipeline.
#[derive(Debug, Clone)]
pub struct SegmentState {
    pub index: usize,
    pub status: SegmentStatus,
    pub attempts: u32,
    /// Issues from the most recent failed attempt.
    pub last_issues: Vec<String>,
    /// Set when the segment resolved via placeholder substitution.
    pub placeholder: bool,
}

impl SegmentState {
    pub fn new(index: usize) -> Self {
        SegmentState {
            index,
            status: SegmentStatus::Pending,
            attempts: 0,
            last_issues: Vec::new(),
            placeholder: false,
        }
    }

    /// Move to `to`, enforcing the transition table.
    pub fn transition(&mut self, to: SegmentStatus) -> Result<()> {
        if !is_valid_transition(self.status, to) {
            bail!(
                "invalid segment transition: {:?} → {to:?} (segment {})",
                self.status,
                self.index
            );
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut state = SegmentState::new(0);
        for to in [
            SegmentStatus::Generating,
            SegmentStatus::Formatting,
            SegmentStatus::Validating,
            SegmentStatus::Accepted,
        ] {
            state.transition(to).unwrap();
        }
        assert_eq!(state.status, SegmentStatus::Accepted);
    }

    #[test]
    fn generation_failure_skips_to_retrying() {
        let mut state = SegmentState::new(0);
        state.transition(SegmentStatus::Generating).unwrap();
        state.transition(SegmentStatus::Retrying).unwrap();
        state.transition(SegmentStatus::Generating).unwrap();
        assert_eq!(state.status, SegmentStatus::Generating);
    }

    #[test]
    fn retrying_can_resolve_to_failed() {
        let mut state = SegmentState::new(0);
        state.transition(SegmentStatus::Generating).unwrap();
        state.transition(SegmentStatus::Retrying).unwrap();
        state.transition(SegmentStatus::Failed).unwrap();
    }

    #[test]
    fn accepted_is_terminal() {
        let mut state = SegmentState::new(0);
        state.transition(SegmentStatus::Generating).unwrap();
        state.transition(SegmentStatus::Formatting).unwrap();
        state.transition(SegmentStatus::Validating).unwrap();
        state.transition(SegmentStatus::Accepted).unwrap();
        assert!(state.transition(SegmentStatus::Generating).is_err());
    }

    #[test]
    fn cannot_skip_formatting() {
        let mut state = SegmentState::new(0);
        state.transition(SegmentStatus::Generating).unwrap();
        assert!(state.transition(SegmentStatus::Validating).is_err());
        assert!(state.transition(SegmentStatus::Accepted).is_err());
    }
}
