//! Grade scoring, history reconciliation and extraction normalization.
//!
//! Everything here is synchronous and side-effect free apart from logging.
//! History functions take a `History` by value and hand back the next one.

pub mod draft;
pub mod history;
pub mod normalizer;
pub mod scoring;

pub use draft::{Draft, DraftSource};
pub use history::cumulative_inputs;
pub use normalizer::normalize;
pub use scoring::{compute_cumulative_score, ScoreBand};
