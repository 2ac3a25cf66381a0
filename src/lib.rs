//! Turns pasted folder trees into real folders and files.
//!
//! Trees drawn with box-drawing glyphs, ascii connectors, bullets, numbered
//! lists or bare indentation are parsed into ordered [`Entry`] values, then
//! created under a destination directory without touching anything that
//! already exists.
pub mod api;
pub mod classify;
pub mod config;
pub mod entry;
pub mod errors;
pub mod extensions;
pub mod fs;
pub mod materialize;
pub mod parser;
pub mod preview;
pub mod prompt;
pub mod workspace;

mod utils;

pub use api::{create_structure, prepare, preview_structure, FailureCategory, Options, SproutError};
pub use entry::{Entry, EntryKind};
pub use materialize::{materialize, materialize_with, Outcome, Step};
pub use parser::{parse, Parser};
