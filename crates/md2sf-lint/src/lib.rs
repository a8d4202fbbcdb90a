//! Prose quality gate for knowledge articles.
//!
//! Runs before conversion and can stop it:
//!
//! - [`QualityGate`] wraps a [`ProseLinter`] (usually a [`CommandLinter`]
//!   running `proselint` or `vale`) and reports a [`Verdict`]. Any finding
//!   blocks the conversion.
//! - [`SpellCheck`] is a separate, opt-in stage that checks the document's
//!   prose through a [`SpellChecker`] and reports words by line. Its findings
//!   are advisory only.
//!
//! Neither stage modifies the document.

mod error;
mod finding;
mod gate;
mod linter;
mod spell;

pub use error::LintError;
pub use finding::{Finding, parse_findings};
pub use gate::{QualityGate, Verdict};
pub use linter::{CommandLinter, ProseLinter};
pub use spell::{CommandSpellChecker, Misspelling, SpellCheck, SpellChecker};
