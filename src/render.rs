//! Text and JSON rendering.
//!
//! Every function here is pure: it takes resolved data and returns a
//! `String`. Writing to the terminal and deciding exit codes is the
//! dispatcher's job.
//!
//! # Entry layout
//!
//! ~~~text
//! Creating a Script or Add-In
//! ===========================
//! id:    GUID-9910880d-2299-4947-917a-39b5f030eef4
//! kind:  manual-section
//! url:   https://help.autodesk.com/...
//!
//! <body>
//!
//! --- Example (Python) ---
//! ```python
//! <code>
//! ```
//!
//! --- See also (2) ---
//!   Application   Application Object
//!   Occurrence    (broken link)
//! ~~~

use serde::Serialize;

use crate::models::{CodeExample, DocEntry, DocKind, SampleLanguage, Summary};
use crate::resolve::{BrokenReference, ExampleChoice, Reference};

/// Knobs that affect the text layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap prose at this many columns; `0` leaves lines as authored.
    pub width: usize,
}

// ─── Text ───────────────────────────────────────────────────────────

/// Render a single entry with its chosen example and one hop of references.
pub fn render_entry(
    entry: &DocEntry,
    example: &ExampleChoice<'_>,
    references: &[Reference<'_>],
    options: &RenderOptions,
) -> String {
    let mut out = String::new();

    out.push_str(&entry.title);
    out.push('\n');
    out.push_str(&"=".repeat(textwrap::core::display_width(&entry.title)));
    out.push('\n');
    out.push_str(&format!("id:    {}\n", entry.id));
    out.push_str(&format!("kind:  {}\n", entry.kind));
    if let Some(ref url) = entry.url {
        out.push_str(&format!("url:   {}\n", url));
    }

    let body = clean_markdown(&entry.body);
    let body = wrap_prose(&body, options.width);
    if !body.is_empty() {
        out.push('\n');
        out.push_str(&body);
        out.push('\n');
    }

    match *example {
        ExampleChoice::Exact(ex) => push_example(&mut out, ex),
        ExampleChoice::Substituted { requested, example } => {
            push_example(&mut out, example);
            out.push_str(&format!(
                "Note: no {} example for this entry; showing the {} example instead.\n",
                requested.display_name(),
                example.language.display_name()
            ));
        }
        ExampleChoice::Unavailable { requested } => {
            out.push('\n');
            out.push_str(&format!(
                "Note: no {} example for this entry.\n",
                requested.display_name()
            ));
        }
        ExampleChoice::None => {}
    }

    if !references.is_empty() {
        out.push('\n');
        out.push_str(&format!("--- See also ({}) ---\n", references.len()));
        let id_width = references
            .iter()
            .map(|r| reference_id(r).len())
            .max()
            .unwrap_or(0);
        for r in references {
            let label = match r {
                Reference::Resolved { summary } => summary.title,
                Reference::Broken { .. } => "(broken link)",
            };
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                reference_id(r),
                label,
                width = id_width
            ));
        }
    }

    out
}

fn reference_id<'a>(r: &Reference<'a>) -> &'a str {
    match *r {
        Reference::Resolved { summary } => summary.id,
        Reference::Broken { id } => id,
    }
}

fn push_example(out: &mut String, ex: &CodeExample) {
    out.push('\n');
    out.push_str(&format!("--- Example ({}) ---\n", ex.language.display_name()));
    out.push_str(&format!("```{}\n", ex.language.as_str()));
    out.push_str(ex.code.trim_end());
    out.push_str("\n```\n");
}

/// Render an `ID  TITLE` table under a heading.
pub fn render_summaries(heading: &str, summaries: &[Summary<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", heading, summaries.len()));

    if summaries.is_empty() {
        out.push_str("No entries.\n");
        return out;
    }

    let id_width = summaries
        .iter()
        .map(|s| s.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    out.push_str(&format!("  {:<width$}  TITLE\n", "ID", width = id_width));
    for s in summaries {
        out.push_str(&format!("  {:<width$}  {}\n", s.id, s.title, width = id_width));
    }
    out
}

/// Heading used for `list`-style views of one kind.
pub fn kind_heading(kind: DocKind) -> &'static str {
    kind.plural_label()
}

/// Report of every unresolvable cross-reference.
pub fn render_check(entries_checked: usize, broken: &[BrokenReference<'_>]) -> String {
    let mut out = String::new();
    out.push_str(&format!("entries checked: {}\n", entries_checked));
    out.push_str(&format!("broken references: {}\n", broken.len()));
    if broken.is_empty() {
        out.push_str("ok\n");
        return out;
    }

    let from_width = broken.iter().map(|b| b.from.len()).max().unwrap_or(0);
    for b in broken {
        out.push_str(&format!(
            "  {:<width$}  -> {}\n",
            b.from,
            b.target,
            width = from_width
        ));
    }
    out
}

/// Collapse runs of more than two blank lines, strip trailing whitespace, and
/// drop leading and trailing blank lines. Indentation is kept.
pub fn clean_markdown(content: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();
    let mut blank_count = 0;

    for line in content.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_count += 1;
            if blank_count <= 2 {
                cleaned.push(line);
            }
        } else {
            blank_count = 0;
            cleaned.push(line);
        }
    }

    cleaned.join("\n").trim_matches('\n').to_string()
}

/// Wrap prose lines at `width` columns. Fenced code blocks pass through.
pub fn wrap_prose(content: &str, width: usize) -> String {
    if width == 0 {
        return content.to_string();
    }

    let mut out: Vec<String> = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            out.push(line.to_string());
            continue;
        }
        if in_fence || line.is_empty() || line.starts_with('#') || line.starts_with("    ") {
            out.push(line.to_string());
            continue;
        }

        let indent = if line.starts_with("- ") || line.starts_with("* ") {
            "  "
        } else {
            ""
        };
        let opts = textwrap::Options::new(width)
            .subsequent_indent(indent)
            .break_words(false)
            .word_splitter(textwrap::WordSplitter::NoHyphenation);
        out.push(textwrap::fill(line, opts));
    }

    out.join("\n")
}

// ─── JSON ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct EntryView<'a> {
    id: &'a str,
    title: &'a str,
    kind: DocKind,
    url: Option<&'a str>,
    body: &'a str,
    requested_language: SampleLanguage,
    example: Option<&'a CodeExample>,
    example_substituted: bool,
    references: &'a [Reference<'a>],
}

#[derive(Serialize)]
struct ListView<'a> {
    heading: &'a str,
    count: usize,
    entries: &'a [Summary<'a>],
}

#[derive(Serialize)]
struct CheckView<'a> {
    entries_checked: usize,
    broken: &'a [BrokenReference<'a>],
}

/// JSON form of [`render_entry`].
pub fn entry_json(
    entry: &DocEntry,
    requested: SampleLanguage,
    example: &ExampleChoice<'_>,
    references: &[Reference<'_>],
) -> serde_json::Result<String> {
    let view = EntryView {
        id: &entry.id,
        title: &entry.title,
        kind: entry.kind,
        url: entry.url.as_deref(),
        body: &entry.body,
        requested_language: requested,
        example: example.example(),
        example_substituted: example.is_substituted(),
        references,
    };
    serde_json::to_string_pretty(&view)
}

/// JSON form of [`render_summaries`].
pub fn summaries_json(heading: &str, summaries: &[Summary<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ListView {
        heading,
        count: summaries.len(),
        entries: summaries,
    })
}

/// JSON form of [`render_check`].
pub fn check_json(
    entries_checked: usize,
    broken: &[BrokenReference<'_>],
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&CheckView {
        entries_checked,
        broken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> DocEntry {
        DocEntry {
            id: "Sketch".to_string(),
            title: "Sketch Object".to_string(),
            kind: DocKind::ReferenceObject,
            body: "A 2D sketch.\n\n\n\n\nMore text.   ".to_string(),
            url: Some("https://example.invalid/Sketch".to_string()),
            default_language: None,
            examples: vec![CodeExample {
                language: SampleLanguage::Python,
                code: "import adsk.core\n".to_string(),
            }],
            references: vec!["Component".to_string(), "Ghost".to_string()],
        }
    }

    #[test]
    fn test_entry_contains_title_and_metadata() {
        let e = entry();
        let text = render_entry(
            &e,
            &ExampleChoice::Exact(&e.examples[0]),
            &[],
            &RenderOptions::default(),
        );
        assert!(text.starts_with("Sketch Object\n=============\n"));
        assert!(text.contains("id:    Sketch\n"));
        assert!(text.contains("kind:  reference-object\n"));
        assert!(text.contains("url:   https://example.invalid/Sketch\n"));
        assert!(text.contains("--- Example (Python) ---\n```python\nimport adsk.core\n```\n"));
        assert!(!text.contains("Note:"));
        assert!(!text.contains("See also"));
    }

    #[test]
    fn test_entry_substitution_notice() {
        let e = entry();
        let choice = ExampleChoice::Substituted {
            requested: SampleLanguage::Cpp,
            example: &e.examples[0],
        };
        let text = render_entry(&e, &choice, &[], &RenderOptions::default());
        assert!(text.contains("```python"));
        assert!(text.contains(
            "Note: no C++ example for this entry; showing the Python example instead."
        ));
    }

    #[test]
    fn test_entry_unavailable_notice() {
        let e = entry();
        let choice = ExampleChoice::Unavailable {
            requested: SampleLanguage::Cpp,
        };
        let text = render_entry(&e, &choice, &[], &RenderOptions::default());
        assert!(!text.contains("```"));
        assert!(text.contains("Note: no C++ example for this entry."));
    }

    #[test]
    fn test_entry_marks_broken_links() {
        let e = entry();
        let refs = [
            Reference::Resolved {
                summary: Summary {
                    id: "Component",
                    title: "Component Object",
                    kind: DocKind::ReferenceObject,
                },
            },
            Reference::Broken { id: "Ghost" },
        ];
        let text = render_entry(&e, &ExampleChoice::None, &refs, &RenderOptions::default());
        assert!(text.contains("--- See also (2) ---\n"));
        assert!(text.contains("  Component  Component Object\n"));
        assert!(text.contains("  Ghost      (broken link)\n"));
    }

    #[test]
    fn test_clean_markdown_collapses_blank_runs() {
        assert_eq!(clean_markdown("a\n\n\n\n\nb  \n"), "a\n\n\nb");
        assert_eq!(clean_markdown("a\n\nb"), "a\n\nb");
        assert_eq!(clean_markdown("\n\n  "), "");
    }

    #[test]
    fn test_wrap_prose_leaves_code_alone() {
        let text = "one two three four five six\n```\nlong code line that must not wrap\n```";
        let wrapped = wrap_prose(text, 10);
        assert!(wrapped.starts_with("one two\nthree four\nfive six\n"));
        assert!(wrapped.contains("long code line that must not wrap"));
    }

    #[test]
    fn test_clean_markdown_keeps_leading_indent() {
        assert_eq!(
            clean_markdown("\n\n    app = adsk.core.Application.get()\ntext\n\n"),
            "    app = adsk.core.Application.get()\ntext"
        );
    }

    #[test]
    fn test_wrap_prose_does_not_split_long_tokens() {
        let url = "https://help.autodesk.com/view/fusion360/ENU/?guid=GUID-A92A4B10";
        let text = format!("See {} for details.", url);
        let wrapped = wrap_prose(&text, 20);
        assert!(wrapped.lines().any(|l| l == url), "{}", wrapped);
        assert!(wrapped.starts_with("See\n"));
    }

    #[test]
    fn test_wrap_prose_zero_width_is_identity() {
        assert_eq!(wrap_prose("a b c", 0), "a b c");
    }

    #[test]
    fn test_summaries_table() {
        let rows = [
            Summary {
                id: "Application",
                title: "Application Object",
                kind: DocKind::ReferenceObject,
            },
            Summary {
                id: "Sketch",
                title: "Sketch Object",
                kind: DocKind::ReferenceObject,
            },
        ];
        let text = render_summaries("Reference objects", &rows);
        assert_eq!(
            text,
            "Reference objects (2)\n  ID           TITLE\n  Application  Application Object\n  Sketch       Sketch Object\n"
        );
    }

    #[test]
    fn test_summaries_empty() {
        assert_eq!(render_summaries("Books", &[]), "Books (0)\nNo entries.\n");
    }

    #[test]
    fn test_check_report() {
        let broken = [BrokenReference {
            from: "Component",
            target: "Occurrence",
        }];
        let text = render_check(19, &broken);
        assert!(text.contains("broken references: 1\n"));
        assert!(text.contains("  Component  -> Occurrence\n"));
        assert_eq!(render_check(3, &[]), "entries checked: 3\nbroken references: 0\nok\n");
    }

    #[test]
    fn test_entry_json_shape() {
        let e = entry();
        let choice = ExampleChoice::Substituted {
            requested: SampleLanguage::Cpp,
            example: &e.examples[0],
        };
        let refs = [Reference::Broken { id: "Ghost" }];
        let json = entry_json(&e, SampleLanguage::Cpp, &choice, &refs).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["title"], "Sketch Object");
        assert_eq!(v["kind"], "reference-object");
        assert_eq!(v["requested_language"], "cpp");
        assert_eq!(v["example"]["language"], "python");
        assert_eq!(v["example_substituted"], true);
        assert_eq!(v["references"][0]["status"], "broken");
        assert_eq!(v["references"][0]["id"], "Ghost");
    }
}
