//! Core data models used throughout apidocs.
//!
//! These types represent the documentation entries, code samples, and
//! summaries that flow from the bundled corpus through the resolver and
//! into the formatter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of a documentation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocKind {
    Book,
    ReferenceObject,
    ManualSection,
}

impl DocKind {
    pub const ALL: [DocKind; 3] = [
        DocKind::Book,
        DocKind::ReferenceObject,
        DocKind::ManualSection,
    ];

    /// Stable machine name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            DocKind::Book => "book",
            DocKind::ReferenceObject => "reference-object",
            DocKind::ManualSection => "manual-section",
        }
    }

    /// Human-readable plural used for list headings.
    pub fn plural_label(self) -> &'static str {
        match self {
            DocKind::Book => "Books",
            DocKind::ReferenceObject => "Reference objects",
            DocKind::ManualSection => "Manual sections",
        }
    }
}

impl fmt::Display for DocKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample language for code examples.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SampleLanguage {
    #[default]
    Python,
    #[value(alias = "c++")]
    Cpp,
}

impl SampleLanguage {
    /// Tag used on fenced code blocks and in JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            SampleLanguage::Python => "python",
            SampleLanguage::Cpp => "cpp",
        }
    }

    /// Name shown to people reading the terminal.
    pub fn display_name(self) -> &'static str {
        match self {
            SampleLanguage::Python => "Python",
            SampleLanguage::Cpp => "C++",
        }
    }

    /// Guess the language of an untagged sample from its content.
    ///
    /// C++ markers are checked first.
    pub fn infer(code: &str) -> Option<SampleLanguage> {
        if code.contains("adsk::") || code.contains("Ptr<") || code.contains("#include") {
            Some(SampleLanguage::Cpp)
        } else if code.contains("import adsk") || code.contains("def ") {
            Some(SampleLanguage::Python)
        } else {
            None
        }
    }
}

impl fmt::Display for SampleLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SampleLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(SampleLanguage::Python),
            "cpp" | "c++" => Ok(SampleLanguage::Cpp),
            other => Err(format!("unknown sample language '{}'; use python or cpp", other)),
        }
    }
}

/// A code sample attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    pub language: SampleLanguage,
    pub code: String,
}

/// One documentation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub id: String,
    pub title: String,
    pub kind: DocKind,
    pub body: String,
    pub url: Option<String>,
    /// Per-entry override of the corpus default sample language.
    pub default_language: Option<SampleLanguage>,
    pub examples: Vec<CodeExample>,
    /// Identifiers of other entries, in authored order.
    pub references: Vec<String>,
}

impl DocEntry {
    pub fn example(&self, language: SampleLanguage) -> Option<&CodeExample> {
        self.examples.iter().find(|e| e.language == language)
    }

    pub fn summary(&self) -> Summary<'_> {
        Summary {
            id: &self.id,
            title: &self.title,
            kind: self.kind,
        }
    }
}

/// Identifier + title projection of a [`DocEntry`], used by list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub kind: DocKind,
}

/// Per-invocation request built by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: Option<DocKind>,
    pub id: Option<String>,
    pub text: Option<String>,
    pub language: SampleLanguage,
}

impl Query {
    pub fn list(kind: DocKind, language: SampleLanguage) -> Self {
        Self {
            kind: Some(kind),
            id: None,
            text: None,
            language,
        }
    }

    pub fn show(id: impl Into<String>, language: SampleLanguage) -> Self {
        Self {
            kind: None,
            id: Some(id.into()),
            text: None,
            language,
        }
    }

    pub fn search(text: impl Into<String>, kind: Option<DocKind>, language: SampleLanguage) -> Self {
        Self {
            kind,
            id: None,
            text: Some(text.into()),
            language,
        }
    }
}
