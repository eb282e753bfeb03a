pub mod context;
pub mod fallback;
pub mod planner;
pub mod prompt;
pub mod style;

pub use context::{derive_theme, NarrativeContext, SegmentSummary};
pub use fallback::render_fallback;
pub use planner::{plan_segments, target_slide_count, FocusLabel, NarrativeSegment, SegmentRole};
pub use prompt::build_prompt;
pub use style::{
    commit_digest, CategoryCounts, CustomStyle, StyleOptions, StyleRegistry, StyleTemplate,
    DEFAULT_STYLE,
};
