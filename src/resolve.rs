//! Query resolution against a loaded [`Corpus`].
//!
//! The resolver never mutates the corpus and never prints. Lookups that find
//! nothing are returned as [`Error::NotFound`]; cross-references that point
//! nowhere are returned as [`Reference::Broken`] and logged, so callers can
//! still render the rest of the entry.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{CodeExample, DocEntry, DocKind, SampleLanguage, Summary};
use crate::store::Corpus;

/// Which code sample to show for an entry, and whether it is a substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleChoice<'a> {
    /// The requested language is available.
    Exact(&'a CodeExample),
    /// The requested language is missing; showing the entry's default instead.
    Substituted {
        requested: SampleLanguage,
        example: &'a CodeExample,
    },
    /// The entry has samples, but neither in the requested nor the default language.
    Unavailable { requested: SampleLanguage },
    /// The entry has no samples at all.
    None,
}

impl<'a> ExampleChoice<'a> {
    pub fn example(&self) -> Option<&'a CodeExample> {
        match *self {
            ExampleChoice::Exact(ex) | ExampleChoice::Substituted { example: ex, .. } => Some(ex),
            ExampleChoice::Unavailable { .. } | ExampleChoice::None => None,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, ExampleChoice::Substituted { .. })
    }
}

/// One hop of an entry's cross-reference list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Reference<'a> {
    Resolved {
        #[serde(flatten)]
        summary: Summary<'a>,
    },
    Broken {
        id: &'a str,
    },
}

impl Reference<'_> {
    pub fn is_broken(&self) -> bool {
        matches!(self, Reference::Broken { .. })
    }
}

/// A cross-reference that does not resolve, with the entry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrokenReference<'a> {
    pub from: &'a str,
    pub target: &'a str,
}

/// Restartable iterator over the summaries of one kind, in canonical order.
///
/// A clone replays from the current position; a fresh call to
/// [`Resolver::list_by_kind`] always starts at the beginning.
#[derive(Debug, Clone)]
pub struct Summaries<'a> {
    corpus: &'a Corpus,
    ids: std::slice::Iter<'a, String>,
}

impl<'a> Iterator for Summaries<'a> {
    type Item = Summary<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            if let Some(entry) = self.corpus.get(id) {
                return Some(entry.summary());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.ids.len()))
    }
}

/// Read-only lookups over a corpus handle.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    corpus: &'a Corpus,
}

impl<'a> Resolver<'a> {
    pub fn new(corpus: &'a Corpus) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    /// Exact identifier lookup.
    pub fn resolve_by_id(&self, id: &str) -> Result<&'a DocEntry> {
        self.corpus
            .get(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Summaries of one kind in canonical order (case-insensitive title, then id).
    pub fn list_by_kind(&self, kind: DocKind) -> Summaries<'a> {
        Summaries {
            corpus: self.corpus,
            ids: self.corpus.ids_of_kind(kind).iter(),
        }
    }

    /// Pick the sample for `language`, falling back to the entry's default.
    pub fn resolve_example(
        &self,
        entry: &'a DocEntry,
        language: SampleLanguage,
    ) -> ExampleChoice<'a> {
        if entry.examples.is_empty() {
            return ExampleChoice::None;
        }
        if let Some(ex) = entry.example(language) {
            return ExampleChoice::Exact(ex);
        }

        let fallback = entry
            .default_language
            .unwrap_or_else(|| self.corpus.default_language());
        match entry.example(fallback) {
            Some(example) => {
                tracing::debug!(
                    id = %entry.id,
                    requested = language.as_str(),
                    fallback = fallback.as_str(),
                    "example language substituted"
                );
                ExampleChoice::Substituted {
                    requested: language,
                    example,
                }
            }
            None => ExampleChoice::Unavailable {
                requested: language,
            },
        }
    }

    /// Resolve an entry's own reference list. Only one hop is followed.
    pub fn resolve_references(&self, entry: &'a DocEntry) -> Vec<Reference<'a>> {
        entry
            .references
            .iter()
            .map(|target| match self.corpus.get(target) {
                Some(found) => Reference::Resolved {
                    summary: found.summary(),
                },
                None => {
                    tracing::warn!(from = %entry.id, to = %target, "broken cross-reference");
                    Reference::Broken { id: target }
                }
            })
            .collect()
    }

    /// Case-insensitive substring match on identifier or title.
    ///
    /// Results are grouped by kind (books, reference objects, manual
    /// sections) and keep canonical order within each group.
    pub fn search(&self, text: &str, kind: Option<DocKind>) -> Result<Vec<Summary<'a>>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::Usage("search text must not be empty".to_string()));
        }

        let kinds: Vec<DocKind> = match kind {
            Some(k) => vec![k],
            None => DocKind::ALL.to_vec(),
        };

        let hits = kinds
            .into_iter()
            .flat_map(|k| self.list_by_kind(k))
            .filter(|s| {
                s.id.to_lowercase().contains(&needle) || s.title.to_lowercase().contains(&needle)
            })
            .collect();
        Ok(hits)
    }

    /// Every unresolvable cross-reference in the corpus, in canonical order.
    pub fn broken_references(&self) -> Vec<BrokenReference<'a>> {
        self.corpus
            .iter_canonical()
            .flat_map(|entry| {
                entry
                    .references
                    .iter()
                    .filter(|target| !self.corpus.contains(target))
                    .map(move |target| BrokenReference {
                        from: &entry.id,
                        target,
                    })
            })
            .collect()
    }
}
