use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Result};

const DECK_FILE: &str = "slides.md";
const PREVIEW_URL: &str = "http://localhost:3030";

/// Execute `skald preview`: launch the companion process for an existing deck.
pub fn execute(out_dir: &Path) -> Result<()> {
    let deck_path = out_dir.join(DECK_FILE);
    if !deck_path.exists() {
        bail!(
            "no deck at {} — run `skald generate` first",
            deck_path.display()
        );
    }
    launch(out_dir);
    Ok(())
}

/// Fire-and-forget launch of the Slidev preview process. Its failure is
/// reported but never fatal — the deck on disk is the deliverable.
pub fn launch(out_dir: &Path) {
    let spawned = Command::new("npx")
        .args(["slidev", DECK_FILE, "--open"])
        .current_dir(out_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => {
            println!("▶ preview starting at {PREVIEW_URL} (pid {})", child.id());
        }
        Err(e) => {
            eprintln!("⚠ could not launch preview ({e}); install with: npm install -g @slidev/cli");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_requires_existing_deck() {
        let dir = tempfile::tempdir().unwrap();
        assert!(execute(dir.path()).is_err());
    }
}
