use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use social_sentiment::cli::{init_tracing, CommonArgs};
use social_sentiment::config::{load_env_file, RedditCredentials};
use social_sentiment::fetch::{PostSort, RedditClient, TimeWindow};
use social_sentiment::orchestrator::{analyze_subreddit, emit, RedditTarget};
use social_sentiment::Scorer;

const DEFAULT_CSV: &str = "reddit_sentiment_report.csv";

/// Simple Reddit sentiment analysis bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Subreddit name (without r/)
    #[arg(long)]
    subreddit: String,

    /// Analyze subreddit posts or comments
    #[arg(long, value_enum, default_value_t = RedditTarget::Posts)]
    target: RedditTarget,

    /// Post sorting method (for target=posts)
    #[arg(long, value_enum, default_value_t = PostSort::Hot)]
    sort: PostSort,

    /// Time window for sort=top
    #[arg(long, value_enum, default_value_t = TimeWindow::All)]
    time: TimeWindow,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // credentials are checked before any network call
    load_env_file(args.common.env_file.as_deref())?;
    let creds = RedditCredentials::from_env()?;
    debug!("Reddit credentials resolved - client_id={}", creds.client_id);

    let scorer = Scorer::vader();
    let mut client = RedditClient::new(creds)?;
    client.authenticate().await?;

    info!(
        "Analyzing r/{} - target={:?}, sort={:?}, limit={}",
        args.subreddit, args.target, args.sort, args.common.limit
    );
    let report = analyze_subreddit(
        &client,
        &scorer,
        &args.subreddit,
        args.target,
        args.common.limit,
        args.sort,
        args.time,
    )
    .await?;

    let csv_path = args.common.csv_path_or(DEFAULT_CSV);
    emit(&report, args.common.output, csv_path, &mut std::io::stdout().lock())
}
