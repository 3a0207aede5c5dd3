use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use newsdesk::config::Config;
use newsdesk::feed::{self, Candidate, RefreshOutcome};
use newsdesk::store::{ContentStore, StoreError};
use newsdesk::util::fit_width;

/// Column budget for titles in listings.
const TITLE_WIDTH: usize = 70;

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "News inbox and posted archive for the content dashboard")]
struct Args {
    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Snapshot file, overriding `data_path` from the config
    #[arg(long, value_name = "FILE", global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the news inbox (or the posted archive)
    List {
        /// List posted items instead of news
        #[arg(long)]
        posted: bool,
    },
    /// Check the snapshot and report every problem found
    Validate,
    /// Fetch today's top stories and rewrite the news inbox
    Fetch {
        /// Print the selected stories without writing the snapshot
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the snapshot as canonical JSON
    Export {
        /// Export the snapshot built into the binary
        #[arg(long)]
        builtin: bool,
    },
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(data) = &args.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

fn load_store(config: &Config) -> Result<ContentStore> {
    ContentStore::load(&config.data_path, config.caption_policy()).with_context(|| {
        format!(
            "Failed to load snapshot from {}",
            config.data_path.display()
        )
    })
}

fn print_stories(stories: &[Candidate]) {
    for (i, story) in stories.iter().enumerate() {
        println!(
            "  #{} [{}pts] {} — {}",
            i + 1,
            story.score,
            fit_width(&story.title, TITLE_WIDTH),
            story.source
        );
    }
}

fn list(store: &ContentStore, posted: bool) {
    if posted {
        for item in store.posted() {
            let captions: Vec<&str> = item.captions.keys().map(String::as_str).collect();
            println!(
                "{} ({}) {}",
                item.id,
                item.media_type,
                fit_width(&item.title, TITLE_WIDTH)
            );
            println!(
                "    {} · posted to {} · captions: {}",
                item.date,
                item.platforms.join(", "),
                captions.join(", ")
            );
        }
        println!("{} posted item(s)", store.posted().len());
    } else {
        for item in store.news() {
            println!(
                "#{} [{}] {} — {}",
                item.rank,
                item.pillar,
                fit_width(&item.title, TITLE_WIDTH),
                item.source
            );
            println!("    {} · {} · {}", item.date, item.status, item.url);
        }
        println!("{} news item(s)", store.news().len());
    }
}

fn validate(config: &Config) -> Result<()> {
    match ContentStore::load(&config.data_path, config.caption_policy()) {
        Ok(store) => {
            for warning in store.warnings() {
                println!("warning: {}", warning);
            }
            println!(
                "✓ {} is valid: {} news, {} posted (fingerprint {})",
                config.data_path.display(),
                store.news().len(),
                store.posted().len(),
                store.fingerprint()?
            );
            Ok(())
        }
        Err(StoreError::Invalid(report)) => {
            for error in &report.errors {
                eprintln!("error: {}", error);
            }
            for warning in &report.warnings {
                eprintln!("warning: {}", warning);
            }
            eprintln!(
                "✗ {} has {} error(s)",
                config.data_path.display(),
                report.errors.len()
            );
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| {
            format!("Failed to load snapshot from {}", config.data_path.display())
        }),
    }
}

async fn fetch(config: &Config, dry_run: bool) -> Result<()> {
    let client = feed::build_client().context("Failed to create HTTP client")?;
    let now = Utc::now();
    let run_date = Local::now().date_naive();

    println!("🔍 Fetching today's top AI & tech stories...");

    if dry_run {
        let stories = feed::fetch_top_stories(
            &client,
            &config.sources(),
            config.entries_per_feed,
            &config.curate_options(),
            now,
        )
        .await;
        if stories.is_empty() {
            println!("⚠️  No stories found.");
        } else {
            println!("\n📰 Top {} stories selected (dry run):", stories.len());
            print_stories(&stories);
        }
        return Ok(());
    }

    let outcome = feed::refresh_snapshot(&client, config, &config.sources(), now, run_date)
        .await
        .with_context(|| format!("Failed to refresh {}", config.data_path.display()))?;

    match outcome {
        RefreshOutcome::NoStories => {
            println!("⚠️  No stories found. Keeping existing data.");
        }
        RefreshOutcome::Updated { stories, store } => {
            println!("\n📰 Top {} stories selected:", stories.len());
            print_stories(&stories);
            println!(
                "\n✅ Updated {} with {} stories ({} posted items kept)",
                config.data_path.display(),
                store.news().len(),
                store.posted().len()
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.command {
        Command::List { posted } => list(&load_store(&config)?, posted),
        Command::Validate => validate(&config)?,
        Command::Fetch { dry_run } => fetch(&config, dry_run).await?,
        Command::Export { builtin } => {
            let store = if builtin {
                ContentStore::builtin().context("Built-in snapshot is invalid")?
            } else {
                load_store(&config)?
            };
            print!("{}", store.to_json()?);
        }
    }

    Ok(())
}
