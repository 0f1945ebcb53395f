//! Steam Community Market Trading Bot
//!
//! An automated buy/sell bot for Steam Community Market items.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use steam_market_bot::{
    analytics::Trend,
    bot::TradingBot,
    client::SteamMarketClient,
    config::Config,
    storage::SqliteStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "steam-market-bot")]
#[command(about = "Automated trading bot for Steam Community Market items")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Game marketplace (rust, csgo, dota2)
    #[arg(short, long, default_value = "rust")]
    game: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current prices for all tracked items
    Fetch,
    /// Show trend and volatility analysis for an item
    Analyze {
        /// Market hash name of the item
        item: String,
    },
    /// Show items with the strongest trends
    Trending {
        /// Trend direction: rising or falling
        #[arg(short, long, default_value = "rising")]
        direction: String,
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Show scored buy recommendations
    Recommend {
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Minimum confidence (0-1), defaults to the configured value
        #[arg(short, long)]
        min_confidence: Option<f64>,
    },
    /// Buy the top profit-ranked items
    BuyTop {
        #[arg(short, long, default_value = "5")]
        limit: usize,
        /// Total budget in the configured currency
        #[arg(short, long, default_value = "500")]
        budget: Decimal,
    },
    /// Buy recommendation-ranked items
    BuyMl {
        #[arg(short, long, default_value = "5")]
        limit: usize,
        #[arg(short, long, default_value = "300")]
        budget: Decimal,
        #[arg(short, long)]
        min_confidence: Option<f64>,
    },
    /// Evaluate inventory and list items released by the risk rules
    AutoSell,
    /// Export profitable items to CSV
    Export {
        #[arg(short, long, default_value = "profitable_items.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let store = SqliteStore::connect(&config.database.path).await?;
    let client = SteamMarketClient::new(&config.api)?;
    let bot = TradingBot::new(store, client, config, &cli.game)?;

    match cli.command {
        Commands::Fetch => {
            let summary = bot.refresh_prices().await?;
            println!(
                "Updated {} items, skipped {}",
                summary.updated, summary.skipped
            );
        }
        Commands::Analyze { item } => {
            let analysis = bot.analyze(&item).await?;
            let signal = bot.predict(&item).await;

            println!("{item}");
            println!(
                "  Trend: {} (slope {:.4}, {:+.2}% over {} samples, confidence {:.2})",
                analysis.trend.trend,
                analysis.trend.slope,
                analysis.trend.price_change_pct,
                analysis.trend.samples,
                analysis.trend.confidence
            );
            println!("  Volatility: {:.2}%", analysis.volatility.value);
            println!(
                "  Profitability: {} (score {:.1}/100)",
                signal.classification, signal.score
            );
            for reason in &signal.reasons {
                println!("    - {reason}");
            }
        }
        Commands::Trending { direction, limit } => {
            let direction = match direction.as_str() {
                "falling" => Trend::Falling,
                _ => Trend::Rising,
            };
            let trending = bot.trending(direction, limit).await?;
            if trending.is_empty() {
                println!("No trending items found");
            }
            for item in trending {
                println!(
                    "{:<40} slope {:+.4}  {:+.2}%  ({} samples)",
                    item.name,
                    item.result.slope,
                    item.result.price_change_pct,
                    item.result.samples
                );
            }
        }
        Commands::Recommend {
            limit,
            min_confidence,
        } => {
            let recommendations = bot.recommendations(limit, min_confidence).await;
            if recommendations.is_empty() {
                println!("No recommendations cleared the confidence bar");
            }
            for rec in recommendations {
                println!(
                    "{:<40} score {:>5.1}  price {:>8}  profit {:>6}  [{}]",
                    rec.name,
                    rec.score,
                    rec.price,
                    rec.expected_profit,
                    rec.reasons.join(", ")
                );
            }
        }
        Commands::BuyTop { limit, budget } => {
            let summary = bot.buy_top(limit, budget).await?;
            println!(
                "{} orders placed, total {:.2}",
                summary.orders_placed, summary.total_spent
            );
        }
        Commands::BuyMl {
            limit,
            budget,
            min_confidence,
        } => {
            let summary = bot.buy_ml(limit, budget, min_confidence).await?;
            println!(
                "{} orders placed, total {:.2}",
                summary.orders_placed, summary.total_spent
            );
        }
        Commands::AutoSell => {
            let summary = bot.auto_sell().await?;
            println!(
                "{} items listed for {:.2} total, {} held",
                summary.listed, summary.revenue, summary.held
            );
        }
        Commands::Export { output } => {
            let count = bot.export_csv(&output).await?;
            println!("Exported {count} items to {output}");
        }
    }

    Ok(())
}
