use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use skald_deck::{serialize_deck, SlideDeck};
use skald_narrative::{
    render_fallback, CustomStyle, StyleOptions, StyleRegistry, DEFAULT_STYLE,
};
use skald_pipeline::{CapabilityError, ClaudeCapability, Orchestrator};
use skald_repo::GitRepo;
use tokio_util::sync::CancellationToken;

use crate::cmd_preview;
use crate::config;

/// How far back the range reaches when `--from` is not given.
const DEFAULT_WINDOW: usize = 12;

const DECK_FILE: &str = "slides.md";

pub struct GenerateParams<'a> {
    pub repo_root: &'a Path,
    pub from: Option<&'a str>,
    pub out: Option<PathBuf>,
    pub theme: Option<String>,
    pub style: Option<String>,
    pub prompt_file: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub model: Option<String>,
    pub no_ai: bool,
    pub focus: Option<String>,
    pub audience: Option<String>,
    pub deep_dive: bool,
    pub metrics: bool,
    pub challenges: bool,
    pub team_size: Option<u32>,
    pub dry_run: bool,
    pub preview: bool,
}

/// Execute `skald generate`.
pub fn execute(params: GenerateParams) -> Result<()> {
    let file_config = config::load(params.config_path.as_deref(), params.repo_root)?;

    let out_dir = params
        .out
        .or(file_config.out_dir)
        .unwrap_or_else(|| PathBuf::from("slides"));
    let theme = params
        .theme
        .or(file_config.theme)
        .unwrap_or_else(|| "default".to_string());
    let deck_title = file_config
        .title
        .unwrap_or_else(|| default_deck_title(params.repo_root));
    let model = params.model.or(file_config.model);

    // Style registry is assembled here and injected — never ambient.
    let mut styles = StyleRegistry::builtin();
    let mut style_name = params
        .style
        .clone()
        .or(file_config.style)
        .unwrap_or_else(|| DEFAULT_STYLE.to_string());
    if let Some(path) = &params.prompt_file {
        let custom = CustomStyle::load(path)?;
        if params.style.is_none() {
            style_name = custom.name.clone();
        }
        styles = styles.with_custom(custom);
    }

    let repo = GitRepo::open(params.repo_root)?;
    let from = match params.from {
        Some(rev) => rev.to_string(),
        None => default_window_start(&repo)?,
    };
    let commits = repo.list_range(&from)?;
    println!(
        "Read {} commits ({}..{})",
        commits.len(),
        commits[0].short_id(),
        commits[commits.len() - 1].short_id()
    );

    let options = StyleOptions {
        focus: params.focus,
        audience: params.audience,
        deep_dive: params.deep_dive,
        metrics: params.metrics,
        challenges: params.challenges,
        team_size: params.team_size,
    };

    let deck = if params.no_ai {
        fallback_deck(&commits, &deck_title, &theme)
    } else {
        let capability = match ClaudeCapability::from_env(model.as_deref()) {
            Ok(capability) => capability,
            Err(CapabilityError::Unavailable(message)) => {
                bail!("{message} — export the key or pass --no-ai")
            }
            Err(other) => return Err(other.into()),
        };
        let orchestrator = Orchestrator::new(&capability, &styles, &style_name, options)?;

        let cancel = CancellationToken::new();
        ctrlc_cancel(cancel.clone());

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(orchestrator.run(&commits, &deck_title, &theme, &cancel))?
    };

    let markup = serialize_deck(&deck);
    if params.dry_run {
        print!("{markup}");
        return Ok(());
    }

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    let deck_path = out_dir.join(DECK_FILE);
    std::fs::write(&deck_path, &markup)
        .with_context(|| format!("cannot write deck to {}", deck_path.display()))?;
    println!("✓ wrote {} slides to {}", deck.slides.len(), deck_path.display());

    if params.preview {
        cmd_preview::launch(&out_dir);
    }
    Ok(())
}

/// Whole-deck deterministic path: capability disabled or unavailable.
fn fallback_deck(commits: &[skald_core::Commit], title: &str, theme: &str) -> SlideDeck {
    let mut deck = render_fallback(commits);
    deck.title = title.to_string();
    deck.theme = theme.to_string();
    deck
}

/// Oldest commit of the recent window.
fn default_window_start(repo: &GitRepo) -> Result<String> {
    let recent = repo.list_recent(DEFAULT_WINDOW)?;
    let oldest = recent
        .last()
        .ok_or_else(|| anyhow::anyhow!("repository has no commits"))?;
    Ok(oldest.id.clone())
}

fn default_deck_title(repo_root: &Path) -> String {
    repo_root
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| format!("{name} — Development Recap"))
        .unwrap_or_else(|| "Development Recap".to_string())
}

fn ctrlc_cancel(cancel: CancellationToken) {
    let _ = ctrlc::set_handler(move || {
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;

    fn git(dir: &Path, args: &[&str]) {
        let out = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("run git");
        assert!(out.status.success(), "git {args:?} failed");
    }

    fn fixture_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["config", "user.email", "test@test.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);
        dir
    }

    fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
        fs::write(dir.join(path), content).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    fn generate_no_ai(dir: &Path, out: &Path) -> Result<()> {
        execute(GenerateParams {
            repo_root: dir,
            from: None,
            out: Some(out.to_path_buf()),
            theme: None,
            style: None,
            prompt_file: None,
            config_path: None,
            model: None,
            no_ai: true,
            focus: None,
            audience: None,
            deep_dive: false,
            metrics: false,
            challenges: false,
            team_size: None,
            dry_run: false,
            preview: false,
        })
    }

    #[test]
    fn no_ai_writes_fallback_deck() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: add login");
        commit_file(dir.path(), "b.rs", "fn b() {}", "fix: crash on logout");
        commit_file(dir.path(), "README.md", "# hi", "docs: update readme");

        let out = dir.path().join("deck");
        generate_no_ai(dir.path(), &out).unwrap();

        let markup = fs::read_to_string(out.join(DECK_FILE)).unwrap();
        // challenges section present because one bugfix commit exists
        assert!(markup.contains("# Challenges"));
        assert!(markup.contains("1 feature"));
        assert!(markup.contains("1 bugfix"));
        assert!(markup.contains("1 docs"));
    }

    #[test]
    fn single_commit_no_ai_deck() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: add login");

        let out = dir.path().join("deck");
        generate_no_ai(dir.path(), &out).unwrap();

        let markup = fs::read_to_string(out.join(DECK_FILE)).unwrap();
        // at least 3 slides: headmatter fence plus >= 3 headings
        let headings = markup
            .lines()
            .filter(|line| line.starts_with("# "))
            .count();
        assert!(headings >= 3, "markup:\n{markup}");
        assert!(markup.contains("focused") || markup.contains('1'));
        assert!(!markup.contains("# Challenges"));
    }

    #[test]
    fn unknown_start_commit_writes_nothing() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: add login");

        let out = dir.path().join("deck");
        let result = execute(GenerateParams {
            repo_root: dir.path(),
            from: Some("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef"),
            out: Some(out.clone()),
            theme: None,
            style: None,
            prompt_file: None,
            config_path: None,
            model: None,
            no_ai: true,
            focus: None,
            audience: None,
            deep_dive: false,
            metrics: false,
            challenges: false,
            team_size: None,
            dry_run: false,
            preview: false,
        });

        assert!(result.is_err());
        assert!(!out.join(DECK_FILE).exists());
    }

    #[test]
    fn not_a_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("deck");
        assert!(generate_no_ai(dir.path(), &out).is_err());
    }
}
