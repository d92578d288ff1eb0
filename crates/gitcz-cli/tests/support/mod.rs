use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("git-cz");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env("GIT_CEILING_DIRECTORIES", temp_home.path());
    command.env_remove("RUST_LOG");
    (command, temp_home)
}

pub fn write_config(dir: &Path, raw: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create config dir");
    let path = dir.join("config.toml");
    fs::write(&path, raw).expect("write config");
    path
}

pub fn write_user_config(home: &Path, raw: &str) -> PathBuf {
    write_config(&home.join(".config").join("git-cz"), raw)
}

pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .unwrap_or_else(|| panic!("diagnostics file should end with .log: {name}"));
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
