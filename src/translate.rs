//! EisenScript → EisenXML / JSON translation.
//!
//! XML output goes to `<script>.xml` (so `menger.es` becomes `menger.es.xml`)
//! to match what the node's import expects. JSON output replaces the
//! extension, which yields the data half of an example pair. A tree
//! translated into an output directory keeps its layout there.

use crate::catalog::scanner::is_hidden;
use crate::description::ExampleDescription;
use crate::ruleset::RuleSet;
use crate::xml::to_eisenxml;
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Xml,
    Json,
}

/// Translate script text. `title` is recorded in JSON output only.
pub fn translate_source(source: &str, title: Option<&str>, format: OutputFormat) -> Result<String> {
    let rule_set = RuleSet::from_source(source)?;
    match format {
        OutputFormat::Xml => Ok(to_eisenxml(&rule_set)),
        OutputFormat::Json => {
            let description = ExampleDescription::new(title.map(str::to_string), rule_set);
            let mut json = serde_json::to_string_pretty(&description)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Where the translation of `input` is written.
pub fn output_path(input: &Path, out_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let file_name = input
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("script"));
    let renamed = match format {
        OutputFormat::Xml => {
            let mut name = file_name.into_os_string();
            name.push(".xml");
            PathBuf::from(name)
        }
        OutputFormat::Json => file_name.with_extension("json"),
    };
    match (out_dir, input.parent()) {
        (Some(dir), _) => dir.join(renamed),
        (None, Some(parent)) => parent.join(renamed),
        (None, None) => renamed,
    }
}

/// Output directory for `script` found under `root`: `out_dir` plus the
/// script's directory relative to `root`.
pub fn mirrored_out_dir(root: &Path, script: &Path, out_dir: &Path) -> PathBuf {
    match script.parent().map(|parent| parent.strip_prefix(root)) {
        Some(Ok(relative)) => out_dir.join(relative),
        _ => out_dir.to_path_buf(),
    }
}

/// Translate one file and write the result; returns the output path.
pub fn translate_file(input: &Path, out_dir: Option<&Path>, format: OutputFormat) -> Result<PathBuf> {
    let source =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let title = input.file_stem().and_then(|stem| stem.to_str());
    let rendered = translate_source(&source, title, format)
        .with_context(|| format!("translating {}", input.display()))?;

    let output = output_path(input, out_dir, format);
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(&output, rendered).with_context(|| format!("writing {}", output.display()))?;
    debug!("{} -> {}", input.display(), output.display());
    Ok(output)
}

/// Every script under `root` with the given extension, sorted.
pub fn collect_scripts(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut scripts = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            scripts.push(path.to_path_buf());
        }
    }
    if scripts.is_empty() && !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_paths_follow_format() {
        let input = Path::new("art/menger.es");
        assert_eq!(
            output_path(input, None, OutputFormat::Xml),
            PathBuf::from("art/menger.es.xml")
        );
        assert_eq!(
            output_path(input, None, OutputFormat::Json),
            PathBuf::from("art/menger.json")
        );
        assert_eq!(
            output_path(input, Some(Path::new("out")), OutputFormat::Xml),
            PathBuf::from("out/menger.es.xml")
        );
    }

    #[test]
    fn json_translation_records_title() {
        let json = translate_source("box", Some("cube"), OutputFormat::Json).expect("translate");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["title"], "cube");
        assert_eq!(value["rules"][0]["calls"][0]["shape"], "box");
    }

    #[test]
    fn translate_file_writes_into_out_dir() {
        let temp = TempDir::new().expect("temp dir");
        let input = temp.path().join("tower.es");
        fs::write(&input, "10 * { z 1 } box\n").expect("write script");
        let out_dir = temp.path().join("xml_translate");

        let output = translate_file(&input, Some(&out_dir), OutputFormat::Xml).expect("translate");
        assert_eq!(output, out_dir.join("tower.es.xml"));
        let xml = fs::read_to_string(output).expect("read output");
        assert!(xml.contains("<instance transforms=\"tz 1\" count=\"10\" shape=\"box\"/>"));
    }

    #[test]
    fn parse_failures_name_the_file() {
        let temp = TempDir::new().expect("temp dir");
        let input = temp.path().join("broken.es");
        fs::write(&input, "#define W 3\nbox\n").expect("write script");
        let err = translate_file(&input, None, OutputFormat::Xml).expect_err("define");
        let message = format!("{err:#}");
        assert!(message.contains("broken.es"), "{message}");
        assert!(message.contains("#define"), "{message}");
    }

    #[test]
    fn collect_scripts_recurses_and_sorts() {
        let temp = TempDir::new().expect("temp dir");
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("b.es"), "box").unwrap();
        fs::write(nested.join("a.ES"), "box").unwrap();
        fs::write(temp.path().join("b.es.xml"), "").unwrap();
        fs::create_dir_all(temp.path().join(".drafts")).unwrap();
        fs::write(temp.path().join(".drafts/c.es"), "box").unwrap();
        fs::write(temp.path().join(".d.es"), "box").unwrap();

        let scripts = collect_scripts(temp.path(), "es").expect("collect");
        assert_eq!(
            scripts,
            vec![temp.path().join("b.es"), nested.join("a.ES")]
        );
    }

    #[test]
    fn out_dir_mirrors_the_input_tree() {
        let root = Path::new("art");
        let out = Path::new("out");
        assert_eq!(
            mirrored_out_dir(root, Path::new("art/a/x.es"), out),
            PathBuf::from("out/a")
        );
        assert_eq!(
            mirrored_out_dir(root, Path::new("art/x.es"), out),
            PathBuf::from("out")
        );
        assert_eq!(
            mirrored_out_dir(root, Path::new("elsewhere/x.es"), out),
            PathBuf::from("out")
        );
    }

    #[test]
    fn same_named_scripts_do_not_collide_in_out_dir() {
        let temp = TempDir::new().expect("temp dir");
        let root = temp.path().join("art");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("a/x.es"), "box").unwrap();
        fs::write(root.join("b/x.es"), "sphere").unwrap();
        let out = temp.path().join("out");

        let mut outputs = Vec::new();
        for script in collect_scripts(&root, "es").expect("collect") {
            let dir = mirrored_out_dir(&root, &script, &out);
            outputs.push(translate_file(&script, Some(&dir), OutputFormat::Xml).expect("translate"));
        }
        assert_eq!(
            outputs,
            vec![out.join("a/x.es.xml"), out.join("b/x.es.xml")]
        );
        let second = fs::read_to_string(out.join("b/x.es.xml")).expect("read");
        assert!(second.contains("shape=\"sphere\""), "{second}");
    }
}
