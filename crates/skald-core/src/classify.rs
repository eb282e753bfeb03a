use crate::commit::{CommitCategory, FileChange, FileType};

// ── Subject prefix rules ─────────────────────────────────────────────

const PREFIX_RULES: &[(&str, CommitCategory)] = &[
    ("feat", CommitCategory::Feature),
    ("fix", CommitCategory::Bugfix),
    ("docs", CommitCategory::Docs),
    ("test", CommitCategory::Test),
    ("refactor", CommitCategory::Refactor),
];

/// Leading token of a subject line: up to the first ':' or space, with a
/// conventional-commit `(scope)` suffix and trailing '!' stripped.
fn leading_token(subject: &str) -> String {
    let raw = subject
        .split(|c: char| c == ':' || c == ' ')
        .next()
        .unwrap_or("");
    let raw = raw.split('(').next().unwrap_or("");
    raw.trim_end_matches('!').to_lowercase()
}

/// Classify a commit from its message and changed files. Pure and total.
///
/// Subject prefix rules dominate the file-type fallback: "fix: x" touching
/// only docs still classifies as Bugfix.
pub fn classify_commit(message: &str, file_changes: &[FileChange]) -> CommitCategory {
    let subject = message.lines().next().unwrap_or("");
    let token = leading_token(subject);
    for (prefix, category) in PREFIX_RULES {
        if token == *prefix {
            return *category;
        }
    }

    // No prefix matched: fall back to file-type signals, test > doc > config.
    if file_changes.iter().any(|f| f.file_type == FileType::Test) {
        return CommitCategory::Test;
    }
    if file_changes.iter().any(|f| f.file_type == FileType::Doc) {
        return CommitCategory::Docs;
    }
    if file_changes.iter().any(|f| f.file_type == FileType::Config) {
        return CommitCategory::Config;
    }
    CommitCategory::General
}

// ── File classification ──────────────────────────────────────────────

const CODE_EXTENSIONS: &[&str] = &[
    "rs", "js", "jsx", "ts", "tsx", "py", "go", "java", "kt", "c", "h", "cc", "cpp", "hpp", "cs",
    "rb", "php", "swift", "scala", "sh", "sql", "vue", "svelte",
];

const DOC_EXTENSIONS: &[&str] = &["md", "txt", "rst"];
const CONFIG_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

fn extension(path: &str) -> &str {
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("")
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Classify a file by path and extension. Test paths dominate doc/config
/// extensions so `auth.test.json` counts as test, not config.
pub fn classify_file(path: &str) -> FileType {
    let lower = path.to_lowercase();
    let name = file_name(&lower);
    let ext = extension(&lower);

    if lower.contains("test") || lower.contains("spec") {
        return FileType::Test;
    }
    if DOC_EXTENSIONS.contains(&ext) || name.contains("readme") {
        return FileType::Doc;
    }
    if CONFIG_EXTENSIONS.contains(&ext) || name.contains("config") || name.contains("package") {
        return FileType::Config;
    }
    if CODE_EXTENSIONS.contains(&ext) {
        return FileType::Code;
    }
    FileType::Other
}
