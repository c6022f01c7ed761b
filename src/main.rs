//! # apidocs CLI
//!
//! Browse the CAD add-in API documentation from the terminal.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `apidocs` | List documentation books |
//! | `apidocs books` | List documentation books |
//! | `apidocs reference` | List reference objects |
//! | `apidocs manual` | List manual sections |
//! | `apidocs list <books\|reference\|manual>` | Same listings, explicit form |
//! | `apidocs show <id>` | Show one entry with its code sample |
//! | `apidocs search <text>` | Find entries by identifier or title |
//! | `apidocs check` | Report cross-references that do not resolve |
//! | `apidocs completions <shell>` | Print shell completions |
//!
//! ## Exit codes
//!
//! `0` success, `1` output failure, `2` usage or config error,
//! `3` corpus failed to load, `4` no such entry.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apidocs::dispatch::{self, Command, Invocation};
use apidocs::error::Error;
use apidocs::models::{DocKind, SampleLanguage};

/// apidocs — offline navigator for the CAD add-in API documentation.
///
/// Without a subcommand, lists the documentation books.
#[derive(Parser)]
#[command(
    name = "apidocs",
    about = "apidocs — browse the CAD add-in API documentation offline",
    version,
    long_about = "apidocs lists and displays the bundled API documentation: books, \
    reference objects, and manual sections, with code samples in Python or C++."
)]
struct Cli {
    /// Sample language for code examples.
    ///
    /// Falls back to the entry's default language, with a notice, when the
    /// requested one is not available.
    #[arg(long, short = 'l', global = true, value_enum, ignore_case = true)]
    language: Option<SampleLanguage>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Read the corpus from this file instead of the bundled data.
    #[arg(long, global = true, value_name = "PATH")]
    corpus: Option<PathBuf>,

    /// Path to an optional configuration file (TOML).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug output to stderr. `RUST_LOG` takes precedence when set.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List documentation books.
    Books,

    /// List reference objects.
    Reference,

    /// List manual sections.
    Manual,

    /// List entries of one kind.
    List {
        /// Which kind of entry to list.
        #[arg(value_enum)]
        kind: ListKind,
    },

    /// Show an entry by its identifier.
    ///
    /// Prints the title, metadata, body, one code sample, and the entry's
    /// cross-references. Broken references are marked, not dropped.
    Show {
        /// Entry identifier, e.g. `Application` or a `GUID-...` key.
        id: String,
    },

    /// Find entries whose identifier or title contains the given text.
    Search {
        /// Case-insensitive text to look for.
        text: String,

        /// Restrict results to one kind.
        #[arg(long, value_enum)]
        kind: Option<ListKind>,
    },

    /// Report every cross-reference that does not resolve.
    Check,

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    #[value(alias = "book")]
    Books,
    #[value(aliases = ["references", "reference-object"])]
    Reference,
    #[value(alias = "manual-section")]
    Manual,
}

impl From<ListKind> for DocKind {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Books => DocKind::Book,
            ListKind::Reference => DocKind::ReferenceObject,
            ListKind::Manual => DocKind::ManualSection,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "apidocs=debug" } else { "apidocs=warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = match cli.command {
        None | Some(Commands::Books) => Command::List(DocKind::Book),
        Some(Commands::Reference) => Command::List(DocKind::ReferenceObject),
        Some(Commands::Manual) => Command::List(DocKind::ManualSection),
        Some(Commands::List { kind }) => Command::List(kind.into()),
        Some(Commands::Show { id }) => Command::Show { id },
        Some(Commands::Search { text, kind }) => Command::Search {
            text,
            kind: kind.map(DocKind::from),
        },
        Some(Commands::Check) => Command::Check,
        Some(Commands::Completions { shell }) => {
            // Needs no corpus.
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "apidocs", &mut io::stdout());
            return;
        }
    };

    let invocation = Invocation {
        command,
        language: cli.language,
        json: cli.json,
        corpus: cli.corpus,
        config: cli.config,
    };

    tracing::debug!(command = ?invocation.command, "dispatching");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = dispatch::run(&invocation, &mut out) {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

fn report(e: &Error) {
    let stderr = io::stderr();
    let mut err = stderr.lock();
    let _ = writeln!(err, "error: {}", e);
    if let Some(hint) = e.hint() {
        let _ = writeln!(err, "hint: {}", hint);
    }
}
