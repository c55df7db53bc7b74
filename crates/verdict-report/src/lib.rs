//! Verdict Report: build report model and markdown renderer
//!
//! Turns the structured outcome of a CI build (coverage, warnings, errors)
//! into the markdown body of a pull-request verdict comment.
//!
//! - `BuildReport`: validated, immutable input for one run
//! - `Tier`: coverage bucket selecting a decoration set
//! - `render` / `render_with_decoration`: deterministic markdown output
//!   (randomness is injected by the caller)

pub mod error;
pub mod model;
pub mod render;
pub mod tier;

pub use error::{ReportError, Result};
pub use model::{BuildInfo, BuildReport, Finding, TestCoverage};
pub use render::{
    code_span, contains_marker, escape_cell, render, render_with_decoration, VERDICT_HEADING,
    VERDICT_MARKER,
};
pub use tier::Tier;
