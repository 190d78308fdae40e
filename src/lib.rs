//! Sentiment reports over Reddit and X content.
//!
//! Raw platform items are normalized into [`models::Record`] rows, scored with a
//! lexicon analyzer, folded into a [`models::Summary`] and rendered to the console
//! or a CSV file.

pub mod aggregate;
pub mod api_types;
pub mod cli;
pub mod config;
pub mod export;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod render;
pub mod sentiment;

pub use aggregate::{aggregate, extremes, Tally, DEFAULT_EXTREMES};
pub use models::{Kind, Label, Record, Scores, Summary};
pub use orchestrator::{analyze, emit, OutputMode, Report};
pub use sentiment::{Polarity, PolarityScorer, ScoreError, Scorer, VaderScorer};
