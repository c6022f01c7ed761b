//! Bundled documentation corpus.
//!
//! The corpus is compiled into the binary from `data/corpus.json` and parsed
//! once per process into an immutable [`Corpus`]. Callers receive the corpus
//! by reference; there is no global instance.
//!
//! Loading is all-or-nothing: any structural problem (bad JSON, duplicate
//! identifiers, an empty cross-reference, an example whose language cannot
//! be determined) yields a [`LoadError`] and no corpus at all.
//!
//! # Example
//!
//! ```rust
//! use apidocs::models::DocKind;
//! use apidocs::store::Corpus;
//!
//! let corpus = Corpus::load_from_str(r#"{
//!     "default_language": "python",
//!     "entries": [
//!         { "id": "intro", "title": "Introduction", "kind": "book", "body": "Hello." }
//!     ]
//! }"#).unwrap();
//! assert_eq!(corpus.len(), 1);
//! assert_eq!(corpus.ids_of_kind(DocKind::Book), ["intro".to_string()]);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;
use crate::models::{CodeExample, DocEntry, DocKind, SampleLanguage};

/// The documentation data shipped with the binary.
pub const BUNDLED_CORPUS: &str = include_str!("../data/corpus.json");

// ─── On-disk shape ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCorpus {
    #[serde(default)]
    default_language: SampleLanguage,
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    id: String,
    title: String,
    kind: DocKind,
    #[serde(default)]
    body: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    default_language: Option<SampleLanguage>,
    #[serde(default)]
    examples: Vec<RawExample>,
    #[serde(default)]
    references: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExample {
    #[serde(default)]
    language: Option<SampleLanguage>,
    code: String,
}

// ─── Corpus ─────────────────────────────────────────────────────────

/// Immutable, identifier-indexed set of documentation entries.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: HashMap<String, DocEntry>,
    /// Canonical order per kind: case-insensitive title, then identifier.
    order: BTreeMap<DocKind, Vec<String>>,
    default_language: SampleLanguage,
}

impl Corpus {
    /// Load the corpus bundled into the binary.
    pub fn load() -> Result<Corpus, LoadError> {
        tracing::debug!("loading bundled corpus");
        Self::load_from_str(BUNDLED_CORPUS)
    }

    /// Load a corpus from a JSON file on disk, in place of the bundled one.
    pub fn load_from_path(path: &Path) -> Result<Corpus, LoadError> {
        tracing::debug!(path = %path.display(), "loading corpus from file");
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    /// Parse and validate corpus JSON.
    pub fn load_from_str(json: &str) -> Result<Corpus, LoadError> {
        let raw: RawCorpus = serde_json::from_str(json)?;
        let corpus = Self::build(raw)?;
        tracing::debug!(
            entries = corpus.len(),
            default_language = corpus.default_language.as_str(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    fn build(raw: RawCorpus) -> Result<Corpus, LoadError> {
        let mut entries: HashMap<String, DocEntry> = HashMap::with_capacity(raw.entries.len());

        for (index, raw_entry) in raw.entries.into_iter().enumerate() {
            let entry = validate_entry(index, raw_entry)?;
            if entries.contains_key(&entry.id) {
                return Err(LoadError::DuplicateId { id: entry.id });
            }
            entries.insert(entry.id.clone(), entry);
        }

        let mut order: BTreeMap<DocKind, Vec<String>> = DocKind::ALL
            .iter()
            .map(|kind| (*kind, Vec::new()))
            .collect();
        for entry in entries.values() {
            order.entry(entry.kind).or_default().push(entry.id.clone());
        }
        for ids in order.values_mut() {
            ids.sort_by(|a, b| canonical_cmp(&entries[a], &entries[b]));
        }

        Ok(Corpus {
            entries,
            order,
            default_language: raw.default_language,
        })
    }

    pub fn get(&self, id: &str) -> Option<&DocEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_language(&self) -> SampleLanguage {
        self.default_language
    }

    /// Identifiers of one kind, in canonical order.
    pub fn ids_of_kind(&self, kind: DocKind) -> &[String] {
        self.order.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All entries, grouped by kind and in canonical order within each kind.
    pub fn iter_canonical(&self) -> impl Iterator<Item = &DocEntry> + '_ {
        self.order
            .values()
            .flatten()
            .filter_map(|id| self.entries.get(id))
    }
}

/// Ordering used for every listing: case-insensitive title, then identifier.
pub fn canonical_cmp(a: &DocEntry, b: &DocEntry) -> std::cmp::Ordering {
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

fn validate_entry(index: usize, raw: RawEntry) -> Result<DocEntry, LoadError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Err(LoadError::EmptyId { index });
    }
    if id.chars().any(char::is_whitespace) {
        return Err(LoadError::InvalidId { id });
    }
    let title = raw.title.trim().to_string();
    if title.is_empty() {
        return Err(LoadError::EmptyTitle { id });
    }

    let mut seen: HashSet<SampleLanguage> = HashSet::new();
    let mut examples = Vec::with_capacity(raw.examples.len());
    for (i, ex) in raw.examples.into_iter().enumerate() {
        let language = match ex.language.or_else(|| SampleLanguage::infer(&ex.code)) {
            Some(lang) => lang,
            None => {
                return Err(LoadError::UnknownExampleLanguage {
                    id: id.clone(),
                    index: i,
                })
            }
        };
        if !seen.insert(language) {
            return Err(LoadError::DuplicateExample {
                id,
                language: language.display_name().to_string(),
            });
        }
        examples.push(CodeExample {
            language,
            code: ex.code,
        });
    }

    let mut references = Vec::with_capacity(raw.references.len());
    for (i, target) in raw.references.into_iter().enumerate() {
        let target = target.trim();
        if target.is_empty() {
            return Err(LoadError::EmptyReference {
                id: id.clone(),
                index: i,
            });
        }
        references.push(target.to_string());
    }

    Ok(DocEntry {
        id,
        title,
        kind: raw.kind,
        body: raw.body,
        url: raw.url.filter(|u| !u.trim().is_empty()),
        default_language: raw.default_language,
        examples,
        references,
    })
}
