use std::path::Path;

use anyhow::Result;
use skald_repo::GitRepo;

/// Execute `skald log`: cheap recent-commit listing, newest first.
pub fn execute(repo_root: &Path, limit: usize, json: bool) -> Result<()> {
    let repo = GitRepo::open(repo_root)?;
    let commits = repo.list_recent(limit)?;

    if json {
        for commit in &commits {
            println!("{}", serde_json::to_string(commit)?);
        }
        return Ok(());
    }

    for commit in &commits {
        let short = &commit.id[..commit.id.len().min(7)];
        let date = &commit.timestamp[..commit.timestamp.len().min(10)];
        println!("{short}  {date}  {} ({})", commit.subject, commit.author);
    }
    Ok(())
}
