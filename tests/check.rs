use std::path::Path;
use std::process::{Command, Output};

use git2::{Oid, Repository, Signature, Time};

const CONFIG: &str = "[main]\nticket-spec = \"^(JM|jm)-[0-9]+\"\n";

/// Seconds since the Unix epoch of the first fixture commit.
const EPOCH: i64 = 1_700_000_000;

/// Commit an empty tree `offset` seconds after [`EPOCH`].
fn commit(repo: &Repository, offset: i64, message: &str, parents: &[Oid]) -> Oid {
    let sig = Signature::new("Dev", "dev@example.com", &Time::new(EPOCH + offset, 0)).unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<_> = parents.iter().map(|p| repo.find_commit(*p).unwrap()).collect();
    let parent_refs: Vec<_> = parents.iter().collect();
    repo.commit(None, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// A repository whose HEAD is a merge of a ticketed and a ticket-less branch.
/// Returns the hash of the first-parent commit (not a merge).
fn merge_fixture(dir: &Path) -> Oid {
    let repo = Repository::init(dir).unwrap();
    let base = commit(&repo, 1_000, "JM-1 base", &[]);
    let left = commit(&repo, 2_000, "JM-1966 left side", &[base]);
    let right = commit(&repo, 2_100, "quick fix", &[base]);
    let merge = commit(&repo, 3_000, "Merge branch 'right'", &[left, right]);
    repo.reference("refs/heads/main", merge, true, "test").unwrap();
    repo.set_head("refs/heads/main").unwrap();
    left
}

fn git_risk(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_git-risk"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn reports_tickets_and_ticketless_commits() {
    let dir = tempfile::tempdir().unwrap();
    merge_fixture(dir.path());
    std::fs::write(dir.path().join(".gitrisk.toml"), CONFIG).unwrap();

    let output = git_risk(dir.path(), &[]);
    assert!(
        output.status.success(),
        "git-risk failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Merge branch 'right'"));
    assert!(stdout.contains("  JM-1\n"));
    assert!(stdout.contains("  JM-1966\n"));
    assert!(stdout.contains("quick fix"));
}

#[test]
fn quiet_mode_omits_ticketless_note() {
    let dir = tempfile::tempdir().unwrap();
    merge_fixture(dir.path());
    let config = dir.path().join("risk.toml");
    std::fs::write(&config, CONFIG).unwrap();

    let output = git_risk(
        dir.path(),
        &["--config", config.to_str().unwrap(), "--quiet", "HEAD"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("JM-1966"));
    assert!(!stdout.contains("quick fix"));
}

#[test]
fn json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    merge_fixture(dir.path());
    std::fs::write(dir.path().join(".gitrisk.toml"), CONFIG).unwrap();

    let output = git_risk(dir.path(), &["--format", "json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tickets"], serde_json::json!(["JM-1", "JM-1966"]));
    assert_eq!(json["ticketless"][0]["summary"], "quick fix");
}

#[test]
fn non_merge_commit_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let left = merge_fixture(dir.path());
    std::fs::write(dir.path().join(".gitrisk.toml"), CONFIG).unwrap();

    let output = git_risk(dir.path(), &[&left.to_string()[..10]]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn unknown_reference_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    merge_fixture(dir.path());
    std::fs::write(dir.path().join(".gitrisk.toml"), CONFIG).unwrap();

    let output = git_risk(dir.path(), &["no-such-branch"]);
    assert!(!output.status.success());
}

#[test]
fn missing_config_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    merge_fixture(dir.path());

    let output = git_risk(dir.path(), &[]);
    assert!(!output.status.success());
}

#[test]
fn test_file_prints_tickets_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("risk.toml");
    std::fs::write(&config, "[main]\nticket-spec = \"(JM|jm)-[0-9]+\"\n").unwrap();
    let samples = dir.path().join("samples.txt");
    std::fs::write(
        &samples,
        "fix JM-1966\nsee JM-1726 also\njm-1922 done\ncloses jm-1021\n",
    )
    .unwrap();

    let output = git_risk(
        dir.path(),
        &[
            "-c",
            config.to_str().unwrap(),
            "-t",
            samples.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "git-risk -t failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "JM-1966\nJM-1726\njm-1922\njm-1021\n"
    );
}

#[test]
fn test_file_uses_config_from_repo_option() {
    let repo_dir = tempfile::tempdir().unwrap();
    merge_fixture(repo_dir.path());
    std::fs::write(repo_dir.path().join(".gitrisk.toml"), CONFIG).unwrap();
    let elsewhere = tempfile::tempdir().unwrap();
    let samples = elsewhere.path().join("samples.txt");
    std::fs::write(&samples, "JM-7 first
jm-8 second
").unwrap();

    let output = git_risk(
        elsewhere.path(),
        &[
            "--repo",
            repo_dir.path().to_str().unwrap(),
            "-t",
            samples.to_str().unwrap(),
        ],
    );
    assert!(
        output.status.success(),
        "git-risk -t failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "JM-7\njm-8\n");
}

#[test]
fn test_file_with_unmatched_line_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("risk.toml");
    std::fs::write(&config, CONFIG).unwrap();
    let samples = dir.path().join("samples.txt");
    std::fs::write(&samples, "JM-1 ok\nsee JM-2\n").unwrap();

    let output = git_risk(
        dir.path(),
        &[
            "-c",
            config.to_str().unwrap(),
            "-t",
            samples.to_str().unwrap(),
        ],
    );
    assert!(!output.status.success());
}
