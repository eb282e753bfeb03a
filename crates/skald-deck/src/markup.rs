use crate::slide::{SlideDeck, SlideLayout, SlideRecord};

// ── Slidev markup serialization ──────────────────────────────────────

/// Serialize a deck to Slidev-flavored markdown: a headmatter block, then
/// slides separated by `---` delimiter lines.
pub fn serialize_deck(deck: &SlideDeck) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("theme: {}\n", deck.theme));
    out.push_str(&format!("title: {}\n", deck.title));
    out.push_str("---\n");

    for (i, slide) in deck.slides.iter().enumerate() {
        if i > 0 || slide.layout != SlideLayout::Default {
            write_slide_frontmatter(&mut out, slide, i == 0);
        }
        write_slide_body(&mut out, slide);
    }

    out
}

fn write_slide_frontmatter(out: &mut String, slide: &SlideRecord, first: bool) {
    // The first slide continues the headmatter block; later slides open with
    // the delimiter and, when non-default, a layout block.
    if first {
        // headmatter already closed with `---`; reopen to set layout
        out.truncate(out.trim_end_matches("---\n").len());
        out.push_str(&format!("layout: {}\n", slide.layout.as_str()));
        out.push_str("---\n");
        return;
    }
    out.push('\n');
    out.push_str("---\n");
    if slide.layout != SlideLayout::Default {
        out.push_str(&format!("layout: {}\n", slide.layout.as_str()));
        out.push_str("---\n");
    }
}

fn write_slide_body(out: &mut String, slide: &SlideRecord) {
    out.push('\n');
    out.push_str(&format!("# {}\n", slide.title));
    if let Some(subtitle) = &slide.subtitle {
        if !subtitle.trim().is_empty() {
            out.push_str(&format!("\n## {subtitle}\n"));
        }
    }
    out.push('\n');
    out.push_str(slide.content.trim_end());
    out.push('\n');

    if slide.layout == SlideLayout::TwoCols {
        out.push_str("\n::right::\n\n");
        if let Some(right) = &slide.right_content {
            out.push_str(right.trim_end());
            out.push('\n');
        }
    }

    if let Some(notes) = &slide.notes {
        if !notes.trim().is_empty() {
            out.push_str(&format!("\n<!--\n{}\n-->\n", notes.trim()));
        }
    }
}
