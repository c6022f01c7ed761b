//! Command dispatch.
//!
//! Turns one parsed invocation into exactly one action: load the corpus,
//! build a [`Query`], resolve it, render the result, and write it out.
//! This is the only layer that decides which [`Error`] a failure becomes;
//! the binary maps that error to an exit code.

use std::io::Write;
use std::path::PathBuf;

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::models::{DocKind, Query, SampleLanguage};
use crate::render::{self, RenderOptions};
use crate::resolve::Resolver;
use crate::store::Corpus;

/// Longest identifier accepted on the command line, in bytes.
pub const MAX_ID_LEN: usize = 256;

/// The single action requested by an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every entry of one kind.
    List(DocKind),
    /// Show one entry by identifier.
    Show { id: String },
    /// Find entries whose identifier or title contains `text`.
    Search { text: String, kind: Option<DocKind> },
    /// Report cross-references that do not resolve.
    Check,
}

/// Everything the dispatcher needs from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    /// `--language`; overrides the config file and the corpus default.
    pub language: Option<SampleLanguage>,
    /// `--json`
    pub json: bool,
    /// `--corpus`; overrides `corpus.path` and the bundled data.
    pub corpus: Option<PathBuf>,
    /// `--config`
    pub config: Option<PathBuf>,
}

impl Invocation {
    #[cfg(test)]
    pub fn new(command: Command) -> Self {
        Self {
            command,
            language: None,
            json: false,
            corpus: None,
            config: None,
        }
    }
}

/// Reject identifiers that cannot possibly name an entry.
pub fn validate_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(Error::Usage("identifier must not be empty".to_string()));
    }
    if id.len() > MAX_ID_LEN {
        return Err(Error::Usage(format!(
            "identifier is longer than {} bytes",
            MAX_ID_LEN
        )));
    }
    if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(Error::Usage(format!(
            "malformed identifier '{}': identifiers contain no whitespace",
            id.escape_debug()
        )));
    }
    Ok(())
}

/// Reject search text that would match everything.
pub fn validate_search_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Usage("search text must not be empty".to_string()));
    }
    Ok(())
}

/// Run one invocation, writing rendered output to `out`.
///
/// Arguments are checked before the config or corpus is read, so a usage
/// error is reported as such even when the data is also broken.
pub fn run(inv: &Invocation, out: &mut dyn Write) -> Result<()> {
    match inv.command {
        Command::Show { ref id } => validate_id(id)?,
        Command::Search { ref text, .. } => validate_search_text(text)?,
        Command::List(_) | Command::Check => {}
    }

    let cfg = match inv.config {
        Some(ref path) => config::load_config(path).map_err(Error::Config)?,
        None => Config::default(),
    };
    let config_language = cfg.output.sample_language().map_err(Error::Config)?;

    let corpus = match inv.corpus.as_ref().or(cfg.corpus.path.as_ref()) {
        Some(path) => Corpus::load_from_path(path)?,
        None => Corpus::load()?,
    };

    let language = inv
        .language
        .or(config_language)
        .unwrap_or_else(|| corpus.default_language());
    let options = RenderOptions {
        width: cfg.output.width,
    };

    let resolver = Resolver::new(&corpus);
    let text = match inv.command {
        Command::List(kind) => execute(&resolver, &Query::list(kind, language), inv.json, &options)?,
        Command::Show { ref id } => {
            execute(&resolver, &Query::show(id.as_str(), language), inv.json, &options)?
        }
        Command::Search { ref text, kind } => execute(
            &resolver,
            &Query::search(text.as_str(), kind, language),
            inv.json,
            &options,
        )?,
        Command::Check => check(&resolver, inv.json)?,
    };

    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Resolve a query and render it. Identifier lookups take precedence over
/// search text, which takes precedence over a plain kind listing.
pub fn execute(
    resolver: &Resolver<'_>,
    query: &Query,
    json: bool,
    options: &RenderOptions,
) -> Result<String> {
    if let Some(ref id) = query.id {
        let entry = resolver.resolve_by_id(id)?;
        let example = resolver.resolve_example(entry, query.language);
        let references = resolver.resolve_references(entry);
        tracing::debug!(
            id = %entry.id,
            language = query.language.as_str(),
            references = references.len(),
            broken = references.iter().filter(|r| r.is_broken()).count(),
            "rendering entry"
        );
        return if json {
            Ok(render::entry_json(entry, query.language, &example, &references)
                .map_err(std::io::Error::from)?)
        } else {
            Ok(render::render_entry(entry, &example, &references, options))
        };
    }

    if let Some(ref text) = query.text {
        let hits = resolver.search(text, query.kind)?;
        let heading = format!("Matches for '{}'", text.trim());
        return if json {
            Ok(render::summaries_json(&heading, &hits).map_err(std::io::Error::from)?)
        } else {
            Ok(render::render_summaries(&heading, &hits))
        };
    }

    let kind = query
        .kind
        .ok_or_else(|| Error::Usage("nothing to look up".to_string()))?;
    let summaries: Vec<_> = resolver.list_by_kind(kind).collect();
    let heading = render::kind_heading(kind);
    if json {
        Ok(render::summaries_json(heading, &summaries).map_err(std::io::Error::from)?)
    } else {
        Ok(render::render_summaries(heading, &summaries))
    }
}

fn check(resolver: &Resolver<'_>, json: bool) -> Result<String> {
    let broken = resolver.broken_references();
    for b in &broken {
        tracing::warn!(from = b.from, to = b.target, "broken cross-reference");
    }
    let checked = resolver.corpus().len();
    if json {
        Ok(render::check_json(checked, &broken).map_err(std::io::Error::from)?)
    } else {
        Ok(render::render_check(checked, &broken))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const GUID: &str = "GUID-9910880d-2299-4947-917a-39b5f030eef4";

    fn run_to_string(inv: &Invocation) -> Result<String> {
        let mut buf = Vec::new();
        run(inv, &mut buf)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id(GUID).is_ok());
        assert!(validate_id("Application").is_ok());
        assert!(matches!(validate_id(""), Err(Error::Usage(_))));
        assert!(matches!(validate_id("two words"), Err(Error::Usage(_))));
        assert!(matches!(validate_id("tab\there"), Err(Error::Usage(_))));
        assert!(matches!(
            validate_id(&"x".repeat(MAX_ID_LEN + 1)),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn test_show_default_language_is_python() {
        let inv = Invocation::new(Command::Show {
            id: GUID.to_string(),
        });
        let text = run_to_string(&inv).unwrap();
        assert!(text.contains("Creating a Script or Add-In"));
        assert!(text.contains("```python"));
        assert!(!text.contains("```cpp"));
    }

    #[test]
    fn test_show_cpp_when_requested() {
        let mut inv = Invocation::new(Command::Show {
            id: GUID.to_string(),
        });
        inv.language = Some(SampleLanguage::Cpp);
        let text = run_to_string(&inv).unwrap();
        assert!(text.contains("```cpp"));
        assert!(!text.contains("Note:"));
    }

    #[test]
    fn test_show_cpp_falls_back_with_notice() {
        let mut inv = Invocation::new(Command::Show {
            id: "GUID-E2A1C7B4-6E1F-4E41-8E35-3C4D5E6F7A8B".to_string(),
        });
        inv.language = Some(SampleLanguage::Cpp);
        let text = run_to_string(&inv).unwrap();
        assert!(text.contains("```python"));
        assert!(text.contains("showing the Python example instead"));
    }

    #[test]
    fn test_show_missing_is_not_found() {
        let inv = Invocation::new(Command::Show {
            id: "does-not-exist".to_string(),
        });
        assert!(matches!(run_to_string(&inv), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_malformed_id_is_usage_before_load() {
        let mut inv = Invocation::new(Command::Show {
            id: "bad id".to_string(),
        });
        inv.corpus = Some(PathBuf::from("/nonexistent/corpus.json"));
        assert!(matches!(run_to_string(&inv), Err(Error::Usage(_))));
    }

    #[test]
    fn test_blank_search_is_usage_before_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.json");
        fs::write(&path, "{ not json").unwrap();

        let mut inv = Invocation::new(Command::Search {
            text: "   ".to_string(),
            kind: None,
        });
        inv.corpus = Some(path.clone());
        let err = run_to_string(&inv).unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);

        let mut inv = Invocation::new(Command::Search {
            text: "sketch".to_string(),
            kind: None,
        });
        inv.corpus = Some(path);
        assert!(matches!(run_to_string(&inv), Err(Error::Load(_))));
    }

    #[test]
    fn test_validate_search_text() {
        assert!(validate_search_text("sketch").is_ok());
        assert!(matches!(validate_search_text(""), Err(Error::Usage(_))));
        assert!(matches!(validate_search_text(" \t "), Err(Error::Usage(_))));
    }

    #[test]
    fn test_every_bundled_entry_renders_with_title() {
        let corpus = Corpus::load().unwrap();
        let resolver = Resolver::new(&corpus);
        for entry in corpus.iter_canonical() {
            for language in [SampleLanguage::Python, SampleLanguage::Cpp] {
                let text = execute(
                    &resolver,
                    &Query::show(entry.id.as_str(), language),
                    false,
                    &RenderOptions::default(),
                )
                .unwrap();
                assert!(text.contains(&entry.title), "{}", entry.id);
            }
        }
    }

    #[test]
    fn test_list_reference_sorted_and_non_empty() {
        let text = run_to_string(&Invocation::new(Command::List(DocKind::ReferenceObject))).unwrap();
        assert!(text.starts_with("Reference objects ("));
        let titles: Vec<&str> = text
            .lines()
            .skip(2)
            .filter_map(|l| l.trim().split_once("  ").map(|(_, t)| t.trim()))
            .collect();
        assert!(!titles.is_empty());
        let mut sorted = titles.clone();
        sorted.sort_by_key(|t| t.to_lowercase());
        assert_eq!(titles, sorted);
    }

    #[test]
    fn test_corrupt_corpus_is_load_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corpus.json");
        fs::write(&path, "{\"entries\": [").unwrap();
        for command in [
            Command::List(DocKind::Book),
            Command::Show {
                id: GUID.to_string(),
            },
            Command::Check,
        ] {
            let mut inv = Invocation::new(command);
            inv.corpus = Some(path.clone());
            let err = run_to_string(&inv).unwrap_err();
            assert!(matches!(err, Error::Load(_)));
            assert_ne!(
                err.exit_code(),
                Error::NotFound(String::new()).exit_code()
            );
        }
    }

    #[test]
    fn test_config_language_and_corpus_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("small.json"),
            r#"{"entries": [{"id": "only", "title": "Only Entry", "kind": "book",
                "examples": [{"language": "python", "code": "import adsk"},
                             {"language": "cpp", "code": "Ptr<A> a;"}]}]}"#,
        )
        .unwrap();
        let cfg_path = tmp.path().join("apidocs.toml");
        fs::write(
            &cfg_path,
            "[corpus]\npath = \"small.json\"\n\n[output]\nlanguage = \"cpp\"\n",
        )
        .unwrap();

        let mut inv = Invocation::new(Command::Show {
            id: "only".to_string(),
        });
        inv.config = Some(cfg_path.clone());
        let text = run_to_string(&inv).unwrap();
        assert!(text.contains("```cpp"));

        inv.language = Some(SampleLanguage::Python);
        let text = run_to_string(&inv).unwrap();
        assert!(text.contains("```python"));
    }

    #[test]
    fn test_bad_config_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let cfg_path = tmp.path().join("apidocs.toml");
        fs::write(&cfg_path, "[output]\nwidth = 3\n").unwrap();
        let mut inv = Invocation::new(Command::List(DocKind::Book));
        inv.config = Some(cfg_path);
        let err = run_to_string(&inv).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn test_search_json() {
        let mut inv = Invocation::new(Command::Search {
            text: "sketch".to_string(),
            kind: Some(DocKind::ReferenceObject),
        });
        inv.json = true;
        let text = run_to_string(&inv).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        let ids: Vec<&str> = v["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["Sketch", "SketchCurves", "SketchEntity", "SketchLine"]);
        assert_eq!(v["count"], 4);
    }

    #[test]
    fn test_check_reports_bundled_broken_link() {
        let text = run_to_string(&Invocation::new(Command::Check)).unwrap();
        assert!(text.contains("broken references: 1"));
        assert!(text.contains("Component  -> Occurrence"));
    }
}
