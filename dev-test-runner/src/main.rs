//! Golden fixture runner.
//!
//! Every `fixtures/*.json` holds an input document, an optional compiler
//! configuration and the exact expected output. Usage:
//!
//! ```text
//! dev-test-runner [FIXTURE_DIR] [NAME_REGEX]
//! ```
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use docschema::record::InputDocument;
use docschema::{Compiler, CompilerConfig};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    description: String,
    input: InputDocument,
    #[serde(default)]
    config: Option<CompilerConfig>,
    expected: Value,
}

fn load(path: &Path) -> Result<Fixture, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let de = &mut serde_json::Deserializer::from_str(&source);
    serde_path_to_error::deserialize(de).map_err(|e| format!("at {} → {}", e.path(), e.inner()))
}

fn fixture_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures"));
    let filter = match args.next().map(|raw| Regex::new(&raw)) {
        Some(Ok(rx)) => Some(rx),
        Some(Err(error)) => {
            eprintln!("invalid name filter: {error}");
            return ExitCode::FAILURE;
        }
        None => None,
    };

    let paths = match fixture_paths(&dir) {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("failed to list {}: {error}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    let mut ran = 0usize;
    for path in paths {
        let name = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
        if filter.as_ref().is_some_and(|rx| !rx.is_match(&name)) {
            continue;
        }
        ran += 1;
        let fixture = match load(&path) {
            Ok(x) => x,
            Err(error) => {
                eprintln!("❌ {name}: unreadable fixture: {error}");
                failed += 1;
                continue;
            }
        };
        let compiler = Compiler::new(fixture.config.unwrap_or_default());
        let actual = compiler.compile_set(&fixture.input.into_set()).to_json();
        if actual == fixture.expected {
            eprintln!("✅ {name}");
        } else {
            failed += 1;
            eprintln!("❌ {name}: {}", fixture.description);
            eprintln!("—— expected ——");
            eprintln!("{}", serde_json::to_string_pretty(&fixture.expected).unwrap_or_default());
            eprintln!("—— actual ——");
            eprintln!("{}", serde_json::to_string_pretty(&actual).unwrap_or_default());
        }
    }

    eprintln!("{ran} fixture(s), {failed} failed");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
