//! Slack exporter CLI - main entry point
//!
//! Authenticates, builds the user directory, runs the opted-in export
//! passes in sequence, and writes the reconciled user list last.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use slack_exporter::api::SlackClient;
use slack_exporter::export::{self, ConversationExporter, ExportOptions};
use slack_exporter::history::DEFAULT_PAGE_SIZE;
use slack_exporter::pacing::FixedDelay;
use slack_exporter::users::{self, EncounteredUsers};

#[derive(Parser)]
#[command(name = "slack_exporter")]
#[command(about = "Download Slack DM & group DM history", long_about = None)]
#[command(version)]
struct Cli {
    /// Slack user API token
    #[arg(long, env = "SLACK_TOKEN")]
    token: String,

    /// Output directory (default: run-scoped, named by the current Unix time)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// List conversations only; fetch nothing, write nothing
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Export direct message (1:1) history
    #[arg(long, default_value_t = false)]
    include_direct_messages: bool,

    /// Export group direct message history
    #[arg(long, default_value_t = false)]
    include_group_direct_messages: bool,

    /// Messages per history page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Seconds to wait between conversations (rate-limit mitigation)
    #[arg(long, default_value_t = 15)]
    delay_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("slack_exporter=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| PathBuf::from(chrono::Utc::now().timestamp().to_string()));

    let client = SlackClient::new(cli.token)?;

    let auth = client.auth_test().await?;
    println!(
        "Successfully authenticated for team {} and user {}",
        auth.team, auth.user
    );

    let roster = client.users_list().await?;
    let names = users::build_id_name_map(&roster);
    println!("found {} users", roster.len());

    let options = ExportOptions {
        output_dir,
        dry_run: cli.dry_run,
        page_size: cli.page_size,
    };
    let pacer = FixedDelay::new(Duration::from_secs(cli.delay_secs));
    let exporter = ConversationExporter::new(&client, &names, &options, &pacer);

    let mut encountered = EncounteredUsers::new();
    encountered.insert(&auth.user_id);

    if cli.include_direct_messages {
        encountered.merge(exporter.export_direct_messages(&auth.user_id).await?);
    }

    if cli.include_group_direct_messages {
        encountered.merge(exporter.export_group_direct_messages().await?);
    }

    if !cli.dry_run {
        let records = users::resolve_encountered(&roster, &encountered, &auth.team_id);
        export::write_user_list(&options.output_dir, &records)?;
    }

    Ok(())
}
