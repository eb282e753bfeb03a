use anyhow::Result;
use skald_narrative::{StyleRegistry, DEFAULT_STYLE};

/// Execute `skald styles`: list the built-in prompt styles.
pub fn execute() -> Result<()> {
    let registry = StyleRegistry::builtin();
    for name in registry.names() {
        let blurb = match name {
            "technical" => "concise and precise, detail over enthusiasm",
            "story" => "narrative arc with momentum, plain language",
            "retro" => "honest retrospective, setbacks included",
            _ => "custom style",
        };
        let marker = if name == DEFAULT_STYLE { " (default)" } else { "" };
        println!("{name}{marker} — {blurb}");
    }
    Ok(())
}
