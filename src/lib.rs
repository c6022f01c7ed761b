//! # apidocs
//!
//! An offline navigator for the CAD add-in API documentation.
//!
//! apidocs ships a pre-generated corpus of documentation entries (books,
//! reference objects, and manual sections) inside the binary and lets you
//! list, search, and read them from the terminal, with code samples in
//! either Python or C++.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌──────────┐   ┌───────────┐
//! │ Dispatcher │──▶│ Resolver │──▶│  Corpus  │   │ Formatter │──▶ stdout
//! │   (CLI)    │   │          │   │ (bundled)│   │           │
//! └─────┬──────┘   └────┬─────┘   └──────────┘   └─────▲─────┘
//!       │               └──────── entries ─────────────┘
//!       └──▶ exit code
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! apidocs                                   # list books
//! apidocs reference                         # list reference objects
//! apidocs manual                            # list manual sections
//! apidocs show Application                  # show one entry
//! apidocs --language cpp show Sketch        # prefer the C++ sample
//! apidocs search export                     # find entries by name
//! apidocs check                             # report broken cross-references
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Optional TOML configuration |
//! | [`models`] | Core data types: `DocEntry`, `DocKind`, `SampleLanguage`, `Query` |
//! | [`store`] | Loading and validating the bundled corpus |
//! | [`resolve`] | Lookups, listings, example selection, cross-references |
//! | [`render`] | Text and JSON output |
//! | [`dispatch`] | One invocation end to end |
//! | [`error`] | Error taxonomy and exit codes |

pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod render;
pub mod resolve;
pub mod store;
