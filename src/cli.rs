//! Minimal CLI: records → (compile | check)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use crate::check;
use crate::compile::{CompiledDocument, Compiler};
use crate::config::CompilerConfig;
use crate::error::LoadError;
use crate::path_de::{from_str_with_path, PathError};
use crate::record::{DocumentationSet, InputDocument};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile documented entity attributes into OpenAPI component schemas
#[derive(Parser, Debug)]
#[command(name = "docschema", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile records and print `{"components": {"schemas": ...}}`
    Compile(CompileOut),
    /// compile, then report component counts and structural problems
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// compiler configuration (JSON); built-in tables when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct CompileOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_config(&self) -> Result<CompilerConfig, LoadError> {
        match self.config.as_ref() {
            Some(path) => CompilerConfig::load(path),
            None => Ok(CompilerConfig::default()),
        }
    }

    fn load_documents(&self) -> Result<DocumentationSet, LoadError> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut set = DocumentationSet::default();
        for source_path in source_paths {
            let loaded = self.load_file(&source_path)?;
            log::debug!(
                "{}: {} entities, {} methods",
                source_path.display(),
                loaded.entities.len(),
                loaded.methods.len(),
            );
            set.extend(loaded);
        }
        Ok(set)
    }

    fn load_file(&self, source_path: &Path) -> Result<DocumentationSet, LoadError> {
        let json_error = |source: PathError| LoadError::Json { path: source_path.to_path_buf(), source };
        let source = std::fs::read_to_string(source_path)
            .map_err(|source| LoadError::Io { path: source_path.to_path_buf(), source })?;
        let json_value: Value = from_str_with_path(&source).map_err(json_error)?;
        let documents = match self.jq_expr.as_ref() {
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &json_value).map_err(|error| LoadError::Jq {
                path: source_path.to_path_buf(),
                message: error.to_string(),
            })?,
            None => vec![json_value],
        };
        let mut set = DocumentationSet::default();
        for json_value in documents {
            let document = InputDocument::from_value(json_value).map_err(json_error)?;
            set.extend(document.into_set());
        }
        Ok(set)
    }

    fn compile(&self) -> Result<CompiledDocument> {
        let config = self.load_config().context("loading compiler configuration")?;
        let set = self.load_documents().context("loading documentation records")?;
        Ok(Compiler::new(config).compile_set(&set))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Compile(target) => {
                let document = target.input_settings.compile()?;
                let schema_src = serde_json::to_string_pretty(&document.to_json())?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("creating {}", parent.display()))?;
                    }
                    std::fs::write(out, &schema_src)
                        .with_context(|| format!("writing {}", out.display()))?;
                } else {
                    println!("{schema_src}");
                }
                Ok(())
            }
            Command::Check(target) => {
                let document = target.input_settings.compile()?;
                let report = check::check(&document.schemas);
                let operations = document.parameters.len();
                if report.is_ok() {
                    println!("{}", "✅ component schemas are structurally valid".green());
                } else {
                    println!("{}", "❌ component schemas have problems".red());
                }
                println!("   Entities: {}", report.entities);
                println!("   Shared components: {}", report.shared);
                println!("   Operations with parameters: {operations}");
                for problem in &report.problems {
                    println!("   {} {problem}", "-".red());
                }
                if !report.is_ok() {
                    anyhow::bail!("{} problem(s) found", report.problems.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, LoadError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                return Err(LoadError::EmptyGlob(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docschema-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn cli_parses_compile_flags() {
        let cli = CommandLineInterface::try_parse_from([
            "docschema", "compile", "-i", "a.json", "b/*.json", "--jq-expr", ".entities[]", "-o", "out.json",
        ])
        .unwrap();
        let Command::Compile(target) = cli.cmd else { panic!("expected compile") };
        assert_eq!(target.input_settings.input, ["a.json", "b/*.json"]);
        assert_eq!(target.input_settings.jq_expr.as_deref(), Some(".entities[]"));
        assert_eq!(target.out.as_deref(), Some(Path::new("out.json")));
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = scratch_dir("empty-glob");
        let pattern = format!("{}/*.nothing", dir.display());
        let err = resolve_file_path_patterns([pattern]).unwrap_err();
        assert!(matches!(err, LoadError::EmptyGlob(_)));
    }

    #[test]
    fn loads_documents_through_jq() {
        let dir = scratch_dir("jq");
        let file = dir.join("records.json");
        std::fs::write(
            &file,
            r#"{"payload": [{"name": "Tag", "attributes": [{"name": "name", "type": "String"}]}]}"#,
        )
        .unwrap();
        let settings = InputSettings {
            jq_expr: Some(".payload".into()),
            config: None,
            input: vec![file.display().to_string()],
        };
        let set = settings.load_documents().unwrap();
        assert_eq!(set.entities.len(), 1);
        assert_eq!(set.entities[0].attributes[0].type_descriptor, "String");
    }

    #[test]
    fn parse_errors_carry_the_file() {
        let dir = scratch_dir("bad");
        let file = dir.join("bad.json");
        std::fs::write(&file, r#"{"name": "A", "attributes": [{"name": 3}]}"#).unwrap();
        let settings = InputSettings { jq_expr: None, config: None, input: vec![file.display().to_string()] };
        let err = settings.load_documents().unwrap_err();
        assert!(err.to_string().contains("bad.json"), "{err}");
    }

    #[test]
    fn parse_errors_point_into_the_document() {
        let dir = scratch_dir("bad-set");
        let file = dir.join("set.json");
        std::fs::write(&file, r#"{"entities": [{"name": "A", "attributes": [{"name": "id", "type": 3}]}]}"#)
            .unwrap();
        let settings = InputSettings { jq_expr: None, config: None, input: vec![file.display().to_string()] };
        match settings.load_documents().unwrap_err() {
            LoadError::Json { path, source } => {
                assert_eq!(path, file);
                assert_eq!(source.path, "entities[0].attributes[0].type");
            }
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }

    #[test]
    fn jq_output_errors_point_into_the_document() {
        let dir = scratch_dir("bad-jq");
        let file = dir.join("records.json");
        std::fs::write(&file, r#"{"payload": {"name": "Tag", "attributes": [{"name": "name", "type": "String", "optional": "yes"}]}}"#)
            .unwrap();
        let settings = InputSettings {
            jq_expr: Some(".payload".into()),
            config: None,
            input: vec![file.display().to_string()],
        };
        let Err(LoadError::Json { source, .. }) = settings.load_documents() else { panic!("expected a JSON error") };
        assert_eq!(source.path, "attributes[0].optional");
    }

    #[test]
    fn compile_has_no_debug_flag() {
        let parsed = CommandLineInterface::try_parse_from(["docschema", "compile", "-i", "a.json", "--no-op"]);
        assert!(parsed.is_err());
    }
}
