use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance tag of a normalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Submission,
    Comment,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Positive,
    Neutral,
    Negative,
}

impl Label {
    /// Thresholds are inclusive on both sides: 0.05 is positive, -0.05 is negative.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= 0.05 {
            Label::Positive
        } else if compound <= -0.05 {
            Label::Negative
        } else {
            Label::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Neutral => "neutral",
            Label::Negative => "negative",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width/alignment flags apply
        f.pad(self.as_str())
    }
}

/// Output of the scorer adapter for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub compound: f64, // [-1.0, 1.0]
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub label: Label,
}

/// Platform-agnostic row. Field order here is the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: Kind,
    pub id: String,
    pub timestamp: String, // ISO-8601 UTC or ""
    pub author: String,
    pub context: String,
    pub title: String,
    pub text: String,
    pub url: String,
    pub compound: f64,
    pub pos: f64,
    pub neu: f64,
    pub neg: f64,
    pub label: Label,
}

impl Record {
    pub const FIELDS: [&'static str; 13] = [
        "kind", "id", "timestamp", "author", "context", "title", "text", "url", "compound", "pos",
        "neu", "neg", "label",
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub avg_compound: f64, // rounded to 4 places; 0.0 when count == 0
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}
