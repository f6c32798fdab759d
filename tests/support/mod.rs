#![allow(dead_code)]

use anyhow::{Context, Result};
use eisencat::{ExampleDescription, RuleSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const SPIRAL: &str = r#"// nautilus-style spiral
set maxdepth 300
set background #fff
spiral

rule spiral w 100 {
  { x 0.9 rz 12 s 0.97 hue 3 } spiral
  { s 1.2 } sphere
}

rule spiral w 1 {
  { rz 180 } spiral
}
"#;

pub const TOWER: &str = r#"
/* stacked grids with a nested loop */
8 * { ry 45 } 4 * { z 1.5 } floor

rule floor md 12 > cap {
  { s 2 2 0.2 color white } grid
}

rule cap {
  box::shiny
}
"#;

pub fn helper_binary(name: &str) -> PathBuf {
    match name {
        "eisen-catalog" => PathBuf::from(env!("CARGO_BIN_EXE_eisen-catalog")),
        "eisen-translate" => PathBuf::from(env!("CARGO_BIN_EXE_eisen-translate")),
        other => panic!("unknown helper {other}"),
    }
}

/// Run a helper and capture its output regardless of exit status.
pub fn run_helper(name: &str, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new(helper_binary(name));
    cmd.args(args)
        .env_remove("EISEN_CATALOG_ROOT")
        .env_remove("EISEN_CATALOG_FORMAT")
        .env_remove("EISEN_CATALOG_SCHEMA")
        .env_remove("RUST_LOG");
    cmd.output()
        .with_context(|| format!("failed to run command: {:?}", cmd))
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

/// JSON description matching `script`, as the translator would write it.
pub fn description_for(script: &str, title: &str) -> String {
    let rules = RuleSet::from_source(script).expect("fixture script parses");
    let description = ExampleDescription::new(Some(title.to_string()), rules);
    serde_json::to_string_pretty(&description).expect("serialize description")
}

/// Write `<name>.es` and its matching `<name>.json` under `root`.
pub fn write_pair(root: &Path, name: &str, script: &str) {
    write_file(root, &format!("{name}.es"), script);
    let title = name.rsplit('/').next().unwrap_or(name);
    write_file(root, &format!("{name}.json"), &description_for(script, title));
}
