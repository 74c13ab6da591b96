//! recsys — train the catalog recommenders from CSV datasets and print
//! recommendations as JSON.

use anyhow::Context;
use clap::Parser;
use recsys_core::config::AppConfig;
use recsys_personalization::RecommenderService;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "recsys")]
#[command(about = "Content-based and collaborative recommendations over a product catalog")]
#[command(version)]
struct Cli {
    /// Item dataset CSV (overrides config)
    #[arg(long, env = "RECSYS__DATA__ITEMS_PATH")]
    items: Option<String>,

    /// Ratings dataset CSV (overrides config)
    #[arg(long, env = "RECSYS__DATA__RATINGS_PATH")]
    ratings: Option<String>,

    /// User to recommend for
    #[arg(long)]
    user: Option<String>,

    /// Item to find similar items for
    #[arg(long)]
    item: Option<String>,

    /// Number of recommendations per engine (overrides config)
    #[arg(short = 'n', long = "num", env = "RECSYS__DATA__NUM_RECOMMENDATIONS")]
    num: Option<usize>,

    /// Print the trained users and items instead of recommendations
    #[arg(long, default_value_t = false)]
    list: bool,
}

#[derive(Serialize)]
struct Listing<'a> {
    users: &'a [String],
    items: &'a [recsys_personalization::CatalogEntry],
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recsys=info,recsys_personalization=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(items) = cli.items {
        config.data.items_path = items;
    }
    if let Some(ratings) = cli.ratings {
        config.data.ratings_path = ratings;
    }
    if let Some(n) = cli.num {
        config.data.num_recommendations = n;
    }

    info!(
        items_path = %config.data.items_path,
        ratings_path = %config.data.ratings_path,
        k_neighbors = config.collaborative.k_neighbors,
        "Configuration loaded"
    );

    let service = RecommenderService::from_config(&config);
    let report = service
        .train_from_paths(&config.data.items_path, &config.data.ratings_path)
        .context("training failed")?;

    let output = if cli.list {
        serde_json::to_string_pretty(&Listing {
            users: &report.users,
            items: &report.items,
        })?
    } else {
        let user = cli.user.unwrap_or_default();
        let item = cli.item.unwrap_or_default();
        let recs = service.recommend(&user, &item, config.data.num_recommendations)?;
        serde_json::to_string_pretty(&recs)?
    };

    println!("{}", output);
    Ok(())
}
