//! Raw platform items → [`Record`] rows.
//!
//! Every field that can be absent on the wire is defaulted here, so the rest of the
//! pipeline only ever sees the fixed record schema.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

use crate::api_types::{RawComment, RawMessage, RawPost};
use crate::models::{Kind, Record};
use crate::sentiment::{PolarityScorer, ScoreError, Scorer, VaderScorer};

pub const REDDIT_BASE: &str = "https://reddit.com";
const X_STATUS_BASE: &str = "https://x.com";

/// Epoch seconds → ISO-8601 UTC. Missing, zero, negative and out-of-range values give "".
pub fn epoch_to_iso(epoch: Option<f64>) -> String {
    let Some(ts) = epoch else {
        return String::new();
    };
    if !ts.is_finite() || ts <= 0.0 {
        return String::new();
    }
    let mut secs = ts.trunc() as i64;
    let mut micros = ((ts - ts.trunc()) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        secs += 1;
        micros -= 1_000_000;
    }
    DateTime::<Utc>::from_timestamp(secs, micros * 1_000)
        .map(format_utc)
        .unwrap_or_default()
}

/// RFC 3339 timestamp (any offset) → the same UTC shape as [`epoch_to_iso`].
pub fn rfc3339_to_iso(value: Option<&str>) -> String {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| format_utc(dt.with_timezone(&Utc)))
        .unwrap_or_default()
}

fn format_utc(dt: DateTime<Utc>) -> String {
    // "+00:00" offset; fractional part only when present, at microsecond precision
    let fmt = if dt.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    dt.to_rfc3339_opts(fmt, false)
}

pub fn clean_text(text: Option<&str>) -> String {
    text.unwrap_or("").replace("\r\n", "\n").trim().to_string()
}

/// Reddit reports removed accounts as "[deleted]".
pub fn resolve_author(author: Option<&str>) -> String {
    match author.map(str::trim) {
        None | Some("") | Some("[deleted]") => String::new(),
        Some(name) => name.to_string(),
    }
}

fn reddit_url(permalink: &str) -> String {
    if permalink.starts_with("http://") || permalink.starts_with("https://") {
        permalink.to_string()
    } else {
        format!("{}{}", REDDIT_BASE, permalink)
    }
}

pub fn status_url(author: &str, id: &str) -> String {
    if author.is_empty() {
        format!("{}/i/web/status/{}", X_STATUS_BASE, id)
    } else {
        format!("{}/{}/status/{}", X_STATUS_BASE, author, id)
    }
}

/// Maps raw items to records, scoring each through the shared [`Scorer`].
pub struct Normalizer<'a, P = VaderScorer> {
    scorer: &'a Scorer<P>,
}

impl<'a, P: PolarityScorer> Normalizer<'a, P> {
    pub fn new(scorer: &'a Scorer<P>) -> Self {
        Self { scorer }
    }

    /// Title and body joined by a blank line; `subreddit` comes from the caller.
    pub fn post(&self, raw: &RawPost, subreddit: &str) -> Result<Record, ScoreError> {
        let title = raw.title.clone().unwrap_or_default();
        let body = raw.selftext.as_deref().unwrap_or("");
        let text = format!("{}\n\n{}", title, body).trim().to_string();
        let scores = self.scorer.score(Some(&text))?;
        Ok(Record {
            kind: Kind::Submission,
            id: raw.id.clone(),
            timestamp: epoch_to_iso(raw.created_utc),
            author: resolve_author(raw.author.as_deref()),
            context: subreddit.to_string(),
            title,
            text,
            url: reddit_url(&raw.permalink),
            compound: scores.compound,
            pos: scores.pos,
            neu: scores.neu,
            neg: scores.neg,
            label: scores.label,
        })
    }

    pub fn comment(&self, raw: &RawComment, subreddit: &str) -> Result<Record, ScoreError> {
        let text = clean_text(raw.body.as_deref());
        let scores = self.scorer.score(Some(&text))?;
        Ok(Record {
            kind: Kind::Comment,
            id: raw.id.clone(),
            timestamp: epoch_to_iso(raw.created_utc),
            author: resolve_author(raw.author.as_deref()),
            context: subreddit.to_string(),
            title: String::new(),
            text,
            url: reddit_url(&raw.permalink),
            compound: scores.compound,
            pos: scores.pos,
            neu: scores.neu,
            neg: scores.neg,
            label: scores.label,
        })
    }

    /// `author` is the resolved username, when the caller could resolve one.
    pub fn message(
        &self,
        raw: &RawMessage,
        author: Option<&str>,
        context: &str,
    ) -> Result<Record, ScoreError> {
        let text = clean_text(raw.text.as_deref());
        let scores = self.scorer.score(Some(&text))?;
        let author = resolve_author(author);
        let url = status_url(&author, &raw.id);
        Ok(Record {
            kind: Kind::Message,
            id: raw.id.clone(),
            timestamp: rfc3339_to_iso(raw.created_at.as_deref()),
            author,
            context: context.to_string(),
            title: String::new(),
            text,
            url,
            compound: scores.compound,
            pos: scores.pos,
            neu: scores.neu,
            neg: scores.neg,
            label: scores.label,
        })
    }
}
