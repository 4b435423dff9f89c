mod logging;
mod poll;
mod recent;

use clap::{Parser, Subcommand};
use snspulse_core::Label;
use snspulse_sentiment::SentimentClassifier;

#[derive(Debug, Parser)]
#[command(name = "snspulse")]
#[command(about = "Keyword sentiment ingestion for social search APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Poll the search API for every configured keyword until interrupted
    Poll,
    /// Show the most recently stored records
    Recent {
        /// Number of most recent records to consider
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Only show records whose text contains this (case-insensitive)
        #[arg(long)]
        contains: Option<String>,

        /// Only show records with this label (repeatable)
        #[arg(long = "label")]
        labels: Vec<Label>,

        #[arg(
            long,
            env = "SNSPULSE_DATABASE_URL",
            default_value = snspulse_core::DEFAULT_DATABASE_URL
        )]
        database_url: String,
    },
    /// Score a piece of text without touching the network or database
    Classify {
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Poll => poll::run_poll().await?,
        Commands::Recent {
            limit,
            contains,
            labels,
            database_url,
        } => {
            logging::init_console("warn")?;
            let filter = snspulse_db::RecordFilter {
                text_contains: contains,
                labels,
            };
            recent::run_recent(&database_url, limit, &filter).await?;
        }
        Commands::Classify { text } => {
            let classification = SentimentClassifier::new(snspulse_sentiment::LexiconScorer)
                .classify(&text);
            println!("{:+.3}\t{}", classification.score, classification.label);
        }
    }

    Ok(())
}
