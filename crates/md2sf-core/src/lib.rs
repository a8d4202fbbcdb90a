//! Markdown to Salesforce Knowledge conversion pipeline.
//!
//! Reads one article, runs the optional quality gate and spellcheck stage,
//! and renders the Knowledge HTML fragment:
//!
//! ```ignore
//! use std::path::Path;
//! use md2sf_core::{KbConverter, write_output};
//!
//! let conversion = KbConverter::new().convert_file(Path::new("article.md"))?;
//! write_output(&conversion.output, &conversion.html)?;
//! ```
//!
//! # Architecture
//!
//! - [`KbConverter`]: entry point with builder pattern
//! - [`write_output`]: atomic write of the rendered fragment
//! - [`ConvertError`]: fatal errors; image problems never surface here

mod converter;
mod error;

pub use converter::{Conversion, KbConverter, output_path, write_output};
pub use error::ConvertError;
