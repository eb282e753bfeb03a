use crate::context::NarrativeContext;
use crate::planner::{NarrativeSegment, SegmentRole};
use crate::style::{commit_digest, CategoryCounts, StyleInput, StyleOptions, StyleTemplate};

/// Shape instruction appended to every generation request. The capability
/// must answer with exactly one JSON object in this shape.
const RESPONSE_SHAPE: &str = r#"Respond with a single JSON object and nothing else:
{
  "title": "slide title",
  "subtitle": "optional subtitle or omit",
  "layout": "default | center | two-cols | cover",
  "content": "markdown body",
  "right_content": "right column markdown, only for two-cols",
  "notes": "optional speaker notes"
}"#;

/// Build the full prompt text for one segment's generation call.
pub fn build_prompt(
    segment: &NarrativeSegment,
    context: &NarrativeContext,
    style: &StyleTemplate,
    options: &StyleOptions,
) -> String {
    let digest = commit_digest(&segment.commits);
    let counts = CategoryCounts::tally(&segment.commits);
    let input = StyleInput {
        theme: &context.overall_theme,
        digest: &digest,
        counts: &counts,
        options,
    };

    let mut out = style.render(&input);

    out.push_str(&format!(
        "\nThis is slide {} of {}. Role: {}. Focus: {}.\n",
        context.segment_index + 1,
        context.total_segments,
        segment.role.as_str(),
        segment.focus.as_str(),
    ));
    if context.is_first() {
        out.push_str("It opens the deck.\n");
    } else if context.is_last() {
        out.push_str("It closes the deck.\n");
    }

    match segment.role {
        SegmentRole::Title => {
            out.push_str("Write the opening title slide for the whole presentation.\n");
        }
        SegmentRole::Conclusion => {
            out.push_str("Write the closing summary slide for the whole presentation.\n");
        }
        SegmentRole::Content if segment.commits.is_empty() => {
            out.push_str(
                "No commits fall in this slice; write a brief transitional slide that keeps \
                 the narrative moving.\n",
            );
        }
        SegmentRole::Content => {}
    }

    let previous: Vec<String> = context
        .previous_summaries()
        .map(|s| format!("- \"{}\": {}", s.title, s.excerpt))
        .collect();
    if !previous.is_empty() {
        out.push_str("\nThe previous slides covered:\n");
        out.push_str(&previous.join("\n"));
        out.push_str("\nContinue from them without repeating.\n");
    }

    out.push('\n');
    out.push_str(RESPONSE_SHAPE);
    out
}
