use std::path::{Path, PathBuf};
use std::process::Command;

use skald_core::{classify_file, Commit, CommitStats, CommitSummary, FileChange, FileStatus};
use tracing::debug;

use crate::error::RepoError;

/// Field separator for `git log --format` output. Unit separator is safe
/// against anything that appears in commit subjects.
const SEP: char = '\x1f';

/// Read-only wrapper around one repository's log.
#[derive(Debug)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open a repository at `dir`. Fails if `dir` is not inside a git
    /// working tree.
    pub fn open(dir: &Path) -> Result<Self, RepoError> {
        let probe = Command::new("git")
            .args(["rev-parse", "--git-dir"])
            .current_dir(dir)
            .output()?;
        if !probe.status.success() {
            return Err(RepoError::NotARepository(dir.display().to_string()));
        }
        Ok(GitRepo {
            root: dir.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<String, RepoError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RepoError::Git(format!(
                "git {}: {}",
                args.first().unwrap_or(&""),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn head_exists(&self) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", "HEAD"])
            .current_dir(&self.root)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Cheap recent-commit listing, newest first. No enrichment — meant for
    /// interactive range selection.
    pub fn list_recent(&self, count: usize) -> Result<Vec<CommitSummary>, RepoError> {
        if !self.head_exists() {
            return Err(RepoError::EmptyHistory);
        }
        let format = format!("%H{SEP}%an{SEP}%aI{SEP}%s");
        let n = count.to_string();
        let out = self.run(&["log", "-n", &n, &format!("--format={format}")])?;

        let mut commits = Vec::new();
        for line in out.lines() {
            let mut parts = line.splitn(4, SEP);
            let (Some(id), Some(author), Some(ts), Some(subject)) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                continue;
            };
            commits.push(CommitSummary {
                id: id.to_string(),
                subject: subject.to_string(),
                author: author.to_string(),
                timestamp: ts.to_string(),
            });
        }
        Ok(commits)
    }

    /// Enriched commit range from `from_id` (inclusive) to HEAD (inclusive),
    /// oldest first. Expensive — runs a structural diff per commit.
    pub fn list_range(&self, from_id: &str) -> Result<Vec<Commit>, RepoError> {
        if !self.head_exists() {
            return Err(RepoError::EmptyHistory);
        }

        let resolved = self.resolve_commit(from_id)?;
        let out = self.run(&["rev-list", "--reverse", "HEAD"])?;
        let all: Vec<&str> = out.lines().collect();
        let start = all
            .iter()
            .position(|id| *id == resolved)
            .ok_or_else(|| RepoError::CommitNotFound(from_id.to_string()))?;

        debug!(from = %resolved, count = all.len() - start, "enriching commit range");
        all[start..].iter().map(|id| self.enrich(id)).collect()
    }

    /// Resolve a revision string to a full commit id, or CommitNotFound.
    fn resolve_commit(&self, rev: &str) -> Result<String, RepoError> {
        let output = Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("{rev}^{{commit}}")])
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            return Err(RepoError::CommitNotFound(rev.to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn has_parent(&self, id: &str) -> bool {
        Command::new("git")
            .args(["rev-parse", "--verify", "--quiet", &format!("{id}^")])
            .current_dir(&self.root)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Build one enriched Commit: message fields from the log, per-file
    /// statuses and aggregate stats from a diff against the first parent.
    fn enrich(&self, id: &str) -> Result<Commit, RepoError> {
        let format = format!("%H{SEP}%an{SEP}%aI{SEP}%s{SEP}%b");
        let out = self.run(&["log", "-1", &format!("--format={format}"), id])?;
        let raw = out.trim_end_matches('\n');
        let mut parts = raw.splitn(5, SEP);
        let (Some(full_id), Some(author), Some(ts), Some(subject), body) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(RepoError::Git(format!("unparseable log entry for {id}")));
        };

        let body = body
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        let message = match &body {
            Some(b) => format!("{subject}\n\n{b}"),
            None => subject.to_string(),
        };

        // A root commit has no parent to diff against: degrade to zero
        // stats rather than failing.
        let (stats, file_changes) = if self.has_parent(full_id) {
            self.diff_against_parent(full_id)?
        } else {
            (CommitStats::default(), Vec::new())
        };

        Ok(Commit::new(
            full_id.to_string(),
            message,
            author.to_string(),
            ts.to_string(),
            body,
            stats,
            file_changes,
        ))
    }

    fn diff_against_parent(
        &self,
        id: &str,
    ) -> Result<(CommitStats, Vec<FileChange>), RepoError> {
        let statuses = self.run(&["diff-tree", "--no-commit-id", "-r", "--name-status", id])?;
        let numstat = self.run(&["diff-tree", "--no-commit-id", "-r", "--numstat", id])?;

        let mut file_changes = Vec::new();
        for line in statuses.lines() {
            let mut parts = line.split('\t');
            let (Some(code), Some(path)) = (parts.next(), parts.next()) else {
                continue;
            };
            // Renames/copies carry two paths; the last one is current.
            let path = parts.next().unwrap_or(path);
            let status = match code.chars().next() {
                Some('A') => FileStatus::Added,
                Some('D') => FileStatus::Deleted,
                _ => FileStatus::Modified,
            };
            file_changes.push(FileChange {
                path: path.to_string(),
                status,
                file_type: classify_file(path),
            });
        }

        let mut insertions = 0usize;
        let mut deletions = 0usize;
        for line in numstat.lines() {
            let mut parts = line.split('\t');
            let (Some(ins), Some(del)) = (parts.next(), parts.next()) else {
                continue;
            };
            // Binary files report "-": count as zero.
            insertions += ins.parse::<usize>().unwrap_or(0);
            deletions += del.parse::<usize>().unwrap_or(0);
        }

        let stats = CommitStats {
            files_changed: file_changes.len(),
            insertions,
            deletions,
        };
        Ok((stats, file_changes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_core::{CommitCategory, FileType};
    use std::fs;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("run git");
        assert!(status.status.success(), "git {args:?} failed");
    }

    fn fixture_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["config", "user.email", "test@test.com"]);
        git(dir.path(), &["config", "user.name", "Test"]);
        dir
    }

    fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
        let full = dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content).unwrap();
        git(dir, &["add", "."]);
        git(dir, &["commit", "-q", "-m", message]);
    }

    #[test]
    fn open_rejects_non_repo() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitRepo::open(dir.path()).unwrap_err();
        assert!(matches!(err, RepoError::NotARepository(_)));
    }

    #[test]
    fn empty_repo_reports_no_commits() {
        let dir = fixture_repo();
        let repo = GitRepo::open(dir.path()).unwrap();
        assert!(matches!(repo.list_recent(5), Err(RepoError::EmptyHistory)));
        assert!(matches!(
            repo.list_range("HEAD"),
            Err(RepoError::EmptyHistory)
        ));
    }

    #[test]
    fn list_recent_newest_first() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: first");
        commit_file(dir.path(), "b.rs", "fn b() {}", "feat: second");
        let repo = GitRepo::open(dir.path()).unwrap();

        let recent = repo.list_recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].subject, "feat: second");
        assert_eq!(recent[1].subject, "feat: first");
    }

    #[test]
    fn list_range_oldest_first_and_enriched() {
        let dir = fixture_repo();
        commit_file(dir.path(), "src/main.rs", "fn main() {}", "feat: add main");
        commit_file(dir.path(), "src/lib.rs", "pub fn x() {}\n", "fix: crash on start");
        commit_file(dir.path(), "README.md", "# hi\n", "docs: add readme");

        let repo = GitRepo::open(dir.path()).unwrap();
        let recent = repo.list_recent(10).unwrap();
        let oldest = &recent.last().unwrap().id;

        let range = repo.list_range(oldest).unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range[0].subject(), "feat: add main");
        assert_eq!(range[2].subject(), "docs: add readme");

        // Non-root commits carry per-file changes and stats
        let second = &range[1];
        assert_eq!(second.category, CommitCategory::Bugfix);
        assert_eq!(second.stats.files_changed, 1);
        assert!(second.stats.insertions > 0);
        assert_eq!(second.file_changes[0].path, "src/lib.rs");
        assert_eq!(second.file_changes[0].file_type, FileType::Code);

        let third = &range[2];
        assert_eq!(third.file_changes[0].file_type, FileType::Doc);
    }

    #[test]
    fn root_commit_degrades_to_zero_stats() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: first");
        let repo = GitRepo::open(dir.path()).unwrap();
        let head = repo.list_recent(1).unwrap()[0].id.clone();

        let range = repo.list_range(&head).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].stats, CommitStats::default());
        assert!(range[0].file_changes.is_empty());
    }

    #[test]
    fn range_from_head_is_single_commit() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: first");
        commit_file(dir.path(), "b.rs", "fn b() {}", "feat: second");
        let repo = GitRepo::open(dir.path()).unwrap();

        let range = repo.list_range("HEAD").unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].subject(), "feat: second");
    }

    #[test]
    fn unknown_commit_is_not_found() {
        let dir = fixture_repo();
        commit_file(dir.path(), "a.rs", "fn a() {}", "feat: first");
        let repo = GitRepo::open(dir.path()).unwrap();

        let err = repo.list_range("deadbeefdeadbeefdeadbeefdeadbeefdeadbeef").unwrap_err();
        assert!(matches!(err, RepoError::CommitNotFound(_)));
    }

    #[test]
    fn body_is_captured() {
        let dir = fixture_repo();
        fs::write(dir.path().join("a.rs"), "fn a() {}").unwrap();
        git(dir.path(), &["add", "."]);
        git(
            dir.path(),
            &["commit", "-q", "-m", "feat: thing", "-m", "longer explanation"],
        );
        let repo = GitRepo::open(dir.path()).unwrap();

        let range = repo.list_range("HEAD").unwrap();
        assert_eq!(range[0].body.as_deref(), Some("longer explanation"));
        assert!(range[0].message.contains("longer explanation"));
    }
}
