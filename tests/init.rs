use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_git-risk"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "git-risk init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".gitrisk.toml");
    assert!(config_path.exists(), ".gitrisk.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[main]"));

    // Verify it's valid TOML that gitrisk-core can parse
    let config: gitrisk_core::GitRiskConfig = toml::from_str(&content).unwrap();
    assert!(config.ticket_spec().is_ok());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".gitrisk.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_git-risk"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".gitrisk.toml")).unwrap();
    assert_eq!(content, "# existing");
}
