use std::process::Command;

fn strip_tag_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix('v') {
        Some(rest) if rest.starts_with(|ch: char| ch.is_ascii_digit()) => rest,
        _ => trimmed,
    }
}

fn git_short_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let commit = String::from_utf8(output.stdout).ok()?;
    let commit = commit.trim();
    (!commit.is_empty()).then(|| commit.to_string())
}

fn build_version() -> String {
    if let Ok(version) = std::env::var("POMODORO_TODO_VERSION") {
        let version = strip_tag_prefix(&version);
        if !version.is_empty() {
            return version.to_string();
        }
    }

    let package = env!("CARGO_PKG_VERSION");
    match git_short_commit() {
        Some(commit) => format!("{package} ({commit})"),
        None => package.to_string(),
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=POMODORO_TODO_VERSION");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let version = build_version();
    println!("cargo:rustc-env=POMODORO_TODO_BUILD_VERSION={version}");
}
