//! Salesight - natural-language sales analytics over POS order data
//!
//! A CLI tool that answers plain-English questions about order history.
//! Orders come from a local POS API, metrics are computed locally, and
//! answers are narrated through Ollama with a templated fallback when the
//! model is unavailable.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (connection, config, invalid arguments)

mod agent;
mod analytics;
mod cli;
mod config;
mod intent;
mod models;
mod orders;
mod query;
mod report;

use agent::{Narrator, NarratorConfig};
use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use cli::{Args, OutputFormat};
use config::Config;
use intent::Intent;
use std::io::{BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Salesight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    match args.query {
        Some(ref question) => {
            if let Err(e) = answer_question(question, &args, &config).await {
                error!("Query failed: {}", e);
                eprintln!("\n❌ Error: {}", e);
                std::process::exit(1);
            }
        }
        None => run_repl(&args, &config).await?,
    }

    Ok(())
}

/// Handle --init-config: generate a default .salesight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".salesight.toml");

    if path.exists() {
        eprintln!("⚠️  .salesight.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .salesight.toml")?;

    println!("✅ Created .salesight.toml with default settings.");
    println!("   Edit it to customize the model, API URL, and category mapping.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .salesight.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Interactive prompt: one question per line until quit/exit.
async fn run_repl(args: &Args, config: &Config) -> Result<()> {
    println!("💬 Ask about your sales data (type 'quit' to leave).");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n❓ > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let question = line?.trim().to_string();

        if question.is_empty() {
            continue;
        }
        if matches!(question.as_str(), "quit" | "exit" | "q") {
            break;
        }

        if let Err(e) = answer_question(&question, args, config).await {
            error!("Query failed: {}", e);
            eprintln!("❌ Error: {}", e);
        }
    }

    println!("👋 Bye.");
    Ok(())
}

/// Answer one question end to end: resolve the window, fetch and filter
/// orders, classify the intent, compute facts, render the answer.
async fn answer_question(question: &str, args: &Args, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();

    // Resolve the requested window, defaulting when no date was mentioned.
    let range = match query::parse_date_range(question) {
        Some(range) => range,
        None => {
            if query::has_date_hint(question) {
                println!(
                    "🤔 I couldn't pin down that date. Try \"yesterday\", \
                     \"past 3 days\", or a date like 2024-06-15."
                );
                return Ok(());
            }
            let days = i64::from(config.general.default_days.max(1));
            let start = today - Duration::days(days - 1);
            debug!("No date in question, defaulting to the last {} days", days);
            (start, today)
        }
    };

    // Fetch the recent-orders window from the POS API.
    let client = orders::OrdersClient::new(config.api.base_url.clone(), config.api.timeout_seconds);
    let response = match client.fetch_recent().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Orders API unavailable: {}", e);
            println!("📡 Couldn't reach the orders API: {}", e);
            return Ok(());
        }
    };

    if response.orders.is_empty() {
        println!("📭 The orders API returned no data.");
        return Ok(());
    }

    // The API only serves a rolling window; warn when the question asks for
    // dates outside it.
    let available_days = i64::from(config.general.default_days.max(1));
    let available_start = today - Duration::days(available_days - 1);
    if !query::validate_date_range(range.0, range.1, available_start, today) {
        warn!(
            "Requested {} to {}, but only data since {} is available",
            range.0, range.1, available_start
        );
        println!(
            "⚠️  Only the last {} days of data are available (since {}).",
            available_days, available_start
        );
    }

    let filtered = orders::filter_by_date(response.orders, range.0, range.1);
    if filtered.is_empty() {
        println!("📭 No orders found starting from {}.", range.0);
        return Ok(());
    }
    info!(
        "{} orders in window {} to {}",
        filtered.len(),
        range.0,
        range.1
    );

    // Classify and compute.
    let intent = intent::detect_intent(question);
    println!("🔎 Detected intent: {}", intent);

    let n = effective_count(question, intent, config.general.top_n);
    let facts = analytics::compute_facts(intent, &filtered, n, &config.categories);
    debug!("Computed metric: {}", facts.metric_name());

    // Render.
    if args.format == OutputFormat::Json {
        println!("{}", report::facts_as_json(&facts)?);
        return Ok(());
    }

    let answer = if config.model.narrate {
        narrate_or_fallback(question, intent, &facts, range, config).await
    } else {
        report::fallback_summary(intent.name(), &facts, Some(range), None)
    };

    println!("\n{}", answer);
    Ok(())
}

/// Ranking size for the question: an explicit "top N" wins, item rankings
/// otherwise use the configured default, order rankings default to 1.
fn effective_count(question: &str, intent: Intent, top_n: usize) -> usize {
    let parsed = query::parse_order_count(question);
    match intent {
        Intent::TopItems | Intent::MostFrequentItems if parsed <= 1 => top_n.max(1),
        _ => parsed.max(1),
    }
}

/// Narrate through the LLM, answering from the facts alone when it fails.
async fn narrate_or_fallback(
    question: &str,
    intent: Intent,
    facts: &models::Facts,
    range: (NaiveDate, NaiveDate),
    config: &Config,
) -> String {
    let narrator = Narrator::new(NarratorConfig {
        ollama_url: config.model.ollama_url.clone(),
        model_name: config.model.name.clone(),
        temperature: config.model.temperature,
        timeout_seconds: config.model.timeout_seconds,
    });

    match narrator.narrate(question, intent, facts, Some(range)).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!("Narration failed: {}", e);
            report::fallback_summary(intent.name(), facts, Some(range), Some(&e.to_string()))
        }
    }
}
