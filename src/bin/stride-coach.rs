// ABOUTME: stride-coach CLI - single-shot training plan generation run
// ABOUTME: Loads config from env, applies flag overrides, runs the pipeline once
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Stride Coach CLI
//!
//! Usage:
//! ```bash
//! # Configure the endpoint once
//! export STRIDE_LLM_API_KEY=sk-...
//!
//! # Generate a plan from a screenshot and a goal
//! stride-coach --image activity.png --goal "run a 10k in 8 weeks"
//! ```
//!
//! Exit status is zero when all four outputs (summary, HTML, JSON, database
//! rows) were produced, non-zero on any failure.

use clap::Parser;
use stride_coach::app::CoachApp;
use stride_coach::config::CoachConfig;
use stride_coach::database::Database;
use stride_coach::errors::AppResult;
use stride_coach::llm::OpenAiCompatibleProvider;
use stride_coach::logging::LoggingConfig;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "stride-coach",
    about = "AI running coach - structured training plans from a screenshot and a goal"
)]
struct Args {
    /// Running goal (e.g. "run a 10k in 8 weeks"); overrides STRIDE_GOAL
    #[arg(long)]
    goal: Option<String>,

    /// Path to the wearable screenshot; overrides STRIDE_IMAGE_PATH
    #[arg(long)]
    image: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// HTML output path override
    #[arg(long)]
    html_output: Option<String>,

    /// JSON output path override
    #[arg(long)]
    json_output: Option<String>,
}

async fn run(args: Args) -> AppResult<()> {
    let mut config = CoachConfig::from_env()?;
    if let Some(goal) = args.goal {
        config.goal = Some(goal);
    }
    if let Some(image) = args.image {
        config.image_path = image;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if let Some(html_output) = args.html_output {
        config.html_output = html_output;
    }
    if let Some(json_output) = args.json_output {
        config.json_output = json_output;
    }

    let provider = OpenAiCompatibleProvider::new(config.llm.clone())?;
    let database = Database::new(&config.database_url).await?;

    let app = CoachApp::new(config, Box::new(provider), database);
    let report = app.run().await?;

    info!(
        "Run complete: plan {} ({} weeks)",
        report.plan_id,
        report.plan.week_count()
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = LoggingConfig::from_env().init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
