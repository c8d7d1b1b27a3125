#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub fn mindjournal_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mindjournal").unwrap();
    cmd.env_remove("MINDJOURNAL_ROOT");
    cmd.env_remove("MINDJOURNAL_LOG");
    cmd
}

/// Command running inside an initialized journal at `root`
pub fn journal_cmd(root: &Path) -> Command {
    let mut cmd = mindjournal_cmd();
    cmd.current_dir(root);
    cmd
}

pub fn init_journal(root: &Path) {
    mindjournal_cmd().arg("init").arg(root).assert().success();
}

/// Id of the entry printed first by `list`
pub fn first_entry_id(root: &Path) -> String {
    let output = journal_cmd(root).arg("list").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    stdout
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().next())
        .unwrap()
        .to_string()
}
