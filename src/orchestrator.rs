use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::{extremes, Tally, DEFAULT_EXTREMES};
use crate::export::write_csv;
use crate::fetch::{PostSort, RedditClient, TimeWindow, XClient};
use crate::models::{Record, Summary};
use crate::normalize::Normalizer;
use crate::render::{render_console, render_summary};
use crate::sentiment::{PolarityScorer, ScoreError, Scorer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RedditTarget {
    Posts,
    Comments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Console,
    #[value(alias = "file")]
    Csv,
}

/// What to pull from X: a search query or one account's timeline.
#[derive(Debug, Clone, Copy)]
pub enum XSelector<'a> {
    Query(&'a str),
    User(&'a str),
}

impl XSelector<'_> {
    /// Value stored in each record's `context` column.
    pub fn context(&self) -> String {
        match self {
            XSelector::Query(q) => q.to_string(),
            XSelector::User(u) => format!("@{}", u),
        }
    }
}

/// Final record set and its summary for one run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub records: Vec<Record>,
    pub summary: Summary,
}

/// Normalize every raw item in arrival order while folding the tally.
pub fn analyze<T, F>(items: impl IntoIterator<Item = T>, mut to_record: F) -> Result<Report, ScoreError>
where
    F: FnMut(&T) -> Result<Record, ScoreError>,
{
    let mut tally = Tally::new();
    let mut records = Vec::new();
    for item in items {
        let r = to_record(&item)?;
        tally.push(&r);
        records.push(r);
    }
    Ok(Report {
        summary: tally.summary(),
        records,
    })
}

pub async fn analyze_subreddit<P: PolarityScorer>(
    client: &RedditClient,
    scorer: &Scorer<P>,
    subreddit: &str,
    target: RedditTarget,
    limit: usize,
    sort: PostSort,
    window: TimeWindow,
) -> Result<Report> {
    let n = Normalizer::new(scorer);
    let start = std::time::Instant::now();

    let report = match target {
        RedditTarget::Posts => {
            let posts = client.fetch_posts(subreddit, limit, sort, window).await?;
            analyze(posts, |p| n.post(p, subreddit))?
        }
        RedditTarget::Comments => {
            let comments = client.fetch_comments(subreddit, limit).await?;
            analyze(comments, |c| n.comment(c, subreddit))?
        }
    };

    info!(
        "Subreddit analysis completed - subreddit={}, target={:?}, duration={:.2}s, items={}, avg_compound={}",
        subreddit,
        target,
        start.elapsed().as_secs_f32(),
        report.summary.count,
        report.summary.avg_compound
    );
    Ok(report)
}

pub async fn analyze_x<P: PolarityScorer>(
    client: &XClient,
    scorer: &Scorer<P>,
    selector: XSelector<'_>,
    limit: usize,
) -> Result<Report> {
    let n = Normalizer::new(scorer);
    let context = selector.context();
    let start = std::time::Instant::now();

    let report = match selector {
        XSelector::Query(q) => {
            let found = client.search(q, limit).await?;
            analyze(found.messages.iter(), |m| {
                n.message(m, found.username_of(m), &context)
            })?
        }
        XSelector::User(u) => {
            let timeline = client.fetch_by_author(u, limit).await?;
            analyze(timeline, |m| n.message(m, Some(u), &context))?
        }
    };

    info!(
        "X analysis completed - context={}, duration={:.2}s, items={}, avg_compound={}",
        context,
        start.elapsed().as_secs_f32(),
        report.summary.count,
        report.summary.avg_compound
    );
    Ok(report)
}

/// Console: summary plus extremes. Csv: overwrite `csv_path`, then summary and the path.
pub fn emit<W: Write>(report: &Report, mode: OutputMode, csv_path: &Path, out: &mut W) -> Result<()> {
    match mode {
        OutputMode::Console => {
            let (worst, best) = extremes(&report.records, DEFAULT_EXTREMES);
            out.write_all(render_console(&report.summary, &worst, &best).as_bytes())?;
        }
        OutputMode::Csv => {
            write_csv(csv_path, &report.records)?;
            debug!("CSV persisted - path={}", csv_path.display());
            out.write_all(render_summary(&report.summary).as_bytes())?;
            writeln!(out, "\nCSV written to: {}", csv_path.display())?;
        }
    }
    out.flush()?;
    Ok(())
}
