//! Scorer adapter over the VADER lexicon analyzer.

use thiserror::Error;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::{Label, Scores};

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("sentiment analyzer returned no `{0}` component")]
    MissingComponent(&'static str),
}

/// Raw polarity components as produced by a lexicon analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity {
    pub compound: f64,
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
}

/// Anything that can turn text into polarity components.
pub trait PolarityScorer {
    fn polarity(&self, text: &str) -> Result<Polarity, ScoreError>;
}

pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn polarity(&self, text: &str) -> Result<Polarity, ScoreError> {
        let scores = self.analyzer.polarity_scores(text);
        let get = |key: &'static str| {
            scores
                .get(key)
                .copied()
                .ok_or(ScoreError::MissingComponent(key))
        };
        Ok(Polarity {
            compound: get("compound")?,
            pos: get("pos")?,
            neu: get("neu")?,
            neg: get("neg")?,
        })
    }
}

/// Built once per run and handed to the normalizer.
pub struct Scorer<P = VaderScorer> {
    inner: P,
}

impl Scorer<VaderScorer> {
    pub fn vader() -> Self {
        Self {
            inner: VaderScorer::new(),
        }
    }
}

impl<P: PolarityScorer> Scorer<P> {
    pub fn with(inner: P) -> Self {
        Self { inner }
    }

    /// `None` text is scored as the empty string. Compound is rounded to 4 places and
    /// the components to 3 before the label is derived.
    pub fn score(&self, text: Option<&str>) -> Result<Scores, ScoreError> {
        let p = self.inner.polarity(text.unwrap_or(""))?;
        let compound = round_to(p.compound, 4);
        Ok(Scores {
            compound,
            pos: round_to(p.pos, 3),
            neu: round_to(p.neu, 3),
            neg: round_to(p.neg, 3),
            label: Label::from_compound(compound),
        })
    }
}

fn round_to(x: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (x * f).round() / f
}
