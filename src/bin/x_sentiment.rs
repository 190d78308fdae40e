use anyhow::Result;
use clap::{ArgGroup, Parser};
use tracing::info;

use social_sentiment::cli::{init_tracing, CommonArgs};
use social_sentiment::config::{load_env_file, XCredentials};
use social_sentiment::fetch::XClient;
use social_sentiment::orchestrator::{analyze_x, emit, XSelector};
use social_sentiment::Scorer;

const DEFAULT_CSV: &str = "x_sentiment_report.csv";

/// X/Twitter sentiment analysis using the official API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["query", "user"])))]
struct Args {
    /// Search query, e.g. 'python lang:en -is:retweet'
    #[arg(long)]
    query: Option<String>,

    /// Username (without @) to fetch posts from
    #[arg(long)]
    user: Option<String>,

    /// X API v2 bearer token (optional if TWITTER_BEARER_TOKEN is set)
    #[arg(long)]
    bearer_token: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

impl Args {
    fn selector(&self) -> Option<XSelector<'_>> {
        match (&self.query, &self.user) {
            (Some(q), _) => Some(XSelector::Query(q)),
            (None, Some(u)) => Some(XSelector::User(u.trim_start_matches('@'))),
            (None, None) => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let selector = args
        .selector()
        .ok_or_else(|| anyhow::anyhow!("one of --query or --user is required"))?;

    load_env_file(args.common.env_file.as_deref())?;
    let creds = XCredentials::from_env(args.bearer_token.as_deref())?;

    let scorer = Scorer::vader();
    let client = XClient::new(creds)?;

    info!("Analyzing {} - limit={}", selector.context(), args.common.limit);
    let report = analyze_x(&client, &scorer, selector, args.common.limit).await?;

    let csv_path = args.common.csv_path_or(DEFAULT_CSV);
    emit(&report, args.common.output, csv_path, &mut std::io::stdout().lock())
}
