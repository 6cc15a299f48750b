use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use adjacent::config::Config;
use adjacent::github::client::GithubClient;
use adjacent::output::{markdown, terminal};
use adjacent::pipeline::recommend::{self, Recommendation};

/// Adjacent: related-repository recommendations for GitHub READMEs.
///
/// Scores every other repository owned by the same account against the
/// target by shared topics and README text, and maintains a section of
/// links to the closest ones.
#[derive(Parser)]
#[command(name = "adjacent", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank related repositories and print them
    Rank {
        #[command(flatten)]
        args: RankArgs,

        /// Print the ranked list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rank related repositories and write the README section
    Update {
        #[command(flatten)]
        args: RankArgs,

        /// README to update (default: README_PATH or ./README.md)
        #[arg(long)]
        readme: Option<PathBuf>,

        /// Heading of the managed section (default: SECTION_HEADER or "## 🔗 Adjacent Repositories")
        #[arg(long)]
        header: Option<String>,

        /// Print the rendered section without touching the README
        #[arg(long)]
        dry_run: bool,
    },
}

/// Overrides for the environment configuration.
#[derive(Args)]
struct RankArgs {
    /// Target repository as owner/name (default: GITHUB_REPOSITORY)
    #[arg(long)]
    repo: Option<String>,

    /// Similarity method: topics, readme or combined
    #[arg(long)]
    method: Option<String>,

    /// Topic weight for the combined method, in [0, 1]
    #[arg(long)]
    weight: Option<f64>,

    /// Maximum number of recommendations
    #[arg(long)]
    max: Option<usize>,
}

impl RankArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.repository = repo.clone();
        }
        if let Some(method) = &self.method {
            config.method = method.clone();
        }
        if let Some(weight) = self.weight {
            config.topic_weight = weight;
        }
        if let Some(max) = self.max {
            config.max_results = max;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("adjacent=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rank { args, json } => {
            let mut config = Config::load()?;
            args.apply(&mut config);
            let rec = recommend_for(&config, !json).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&rec.ranked)?);
            } else {
                terminal::display_recommendation(&rec);
            }
        }

        Commands::Update {
            args,
            readme,
            header,
            dry_run,
        } => {
            let mut config = Config::load()?;
            args.apply(&mut config);
            if let Some(path) = readme {
                config.readme_path = path;
            }
            if let Some(header) = header {
                config.section_header = header;
            }
            let rec = recommend_for(&config, true).await?;

            if rec.ranked.is_empty() {
                println!(
                    "{}",
                    "No related repositories found; README left unchanged.".yellow()
                );
                return Ok(());
            }

            if dry_run {
                let block = markdown::render_section(&config.section_header, &rec.ranked);
                terminal::display_section_preview(&block, &rec.ranked);
                return Ok(());
            }

            let changed = markdown::update_readme(
                &config.readme_path,
                &config.section_header,
                &rec.ranked,
            )?;
            if changed {
                println!(
                    "{} {} with {} related repositories",
                    "Updated".green().bold(),
                    config.readme_path.display(),
                    rec.ranked.len()
                );
            } else {
                println!("{} is already up to date", config.readme_path.display());
            }
        }
    }

    Ok(())
}

/// Shared front half of both commands: validate config, build the client,
/// run the pipeline.
async fn recommend_for(config: &Config, show_progress: bool) -> Result<Recommendation> {
    let target = config.require_repository()?;
    let similarity = config.similarity()?;
    let options = config.recommend_options(show_progress);

    let client = GithubClient::new(&config.api_url, config.github_token.as_deref())?
        .with_request_delay(config.request_delay);

    info!(
        repo = %target,
        method = %similarity.method,
        max = similarity.max_results,
        "Finding adjacent repositories"
    );
    recommend::run(&client, &target, &similarity, &options).await
}
