//! Command Line Interface for the perpetuals PnL service.
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use perp_pnl_api::models::FetchPositionsResponse;
use perp_pnl_api::openapi::openapi_json;
use perp_pnl_api::state::http_client;
use perp_pnl_api::{ApiServer, AppConfig, AppState};
use perp_pnl_data::{HermesPriceFeed, PairSource, PriceFeed, SocketApiPairSource};
use perp_pnl_domain::entities::PositionReport;
use perp_pnl_domain::resolvers::resolve_prices;
use perp_pnl_domain::value_objects::WalletAddress;
use prettytable::{Table, row};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "perp-pnl")]
#[command(about = "Open-position PnL and ROI for perpetuals traders", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Host to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch the open positions of a wallet
    Positions {
        /// Trader wallet address
        #[arg(short, long)]
        wallet: String,

        /// RPC endpoint (overrides BASE_RPC_URL)
        #[arg(long)]
        rpc_url: Option<Url>,

        /// Print the JSON response body instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List the pairs known to the pair metadata source
    Pairs,
    /// Fetch latest prices for pair symbols (e.g., ETH/USD)
    Prices {
        /// Pair symbols
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Print the OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let server_config = config.server.clone();
            let state = AppState::from_config(config)?;
            ApiServer::new(server_config, state).run().await?;
        }
        Commands::Positions {
            wallet,
            rpc_url,
            json,
        } => {
            let wallet = WalletAddress::parse(&wallet)?;
            let state = AppState::from_config(config)?;
            let report = state
                .position_service(rpc_url.as_ref())?
                .fetch_positions(&wallet)
                .await?;

            if json {
                let body = FetchPositionsResponse::from(report);
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print_report(&wallet, &report);
            }
        }
        Commands::Pairs => {
            let pairs = pair_source(&config)?;
            let mut pairs: Vec<_> = pairs.get_pairs_info().await?.into_iter().collect();
            pairs.sort_by_key(|(index, _)| *index);

            let mut table = Table::new();
            table.set_titles(row!["Index", "Symbol", "Feed ID"]);
            for (index, info) in &pairs {
                table.add_row(row![
                    index,
                    info.symbol(),
                    info.feed_id.as_deref().unwrap_or("-")
                ]);
            }
            table.printstd();
            println!("{} pairs", pairs.len());
        }
        Commands::Prices { symbols } => {
            let pairs_info = pair_source(&config)?.get_pairs_info().await?;
            let feed = HermesPriceFeed::new(http_client(&config)?, config.hermes_url.clone());
            let prices = resolve_prices(
                &symbols,
                feed.get_latest_prices(&symbols, &pairs_info).await?,
            );

            let mut table = Table::new();
            table.set_titles(row!["Symbol", "Price"]);
            for symbol in &symbols {
                let price = prices
                    .get(symbol)
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                table.add_row(row![symbol, r->price]);
            }
            table.printstd();
        }
        Commands::Openapi => {
            let document = openapi_json();
            if document.is_empty() {
                bail!("Failed to render OpenAPI document");
            }
            println!("{document}");
        }
    }

    Ok(())
}

fn pair_source(config: &AppConfig) -> Result<Arc<dyn PairSource>> {
    let client = http_client(config).context("Failed to build HTTP client")?;
    Ok(Arc::new(SocketApiPairSource::new(
        client,
        config.pairs_api_url.clone(),
    )))
}

fn print_report(wallet: &WalletAddress, report: &PositionReport) {
    info!(wallet = %wallet, positions = report.total_positions, "Positions loaded");

    if report.positions.is_empty() {
        println!("No open positions for {wallet}");
        return;
    }

    let mut table = Table::new();
    table.set_titles(row![
        "Asset", "Side", "Lev", "Size", "Margin", "Entry", "Current", "Liq", "PnL", "ROI %"
    ]);
    for position in &report.positions {
        table.add_row(row![
            position.asset,
            position.direction,
            r->position.leverage.round_dp(2),
            r->position.position_size.round_dp(2),
            r->position.margin.round_dp(2),
            r->position.entry_price,
            r->position.current_price,
            r->position.liquidation_price,
            r->position.pnl.round_dp(2),
            r->position.roi.round_dp(2)
        ]);
    }
    table.printstd();

    let summary = &report.summary;
    println!("Positions:    {}", report.total_positions);
    println!("Total margin: ${:.2}", summary.total_margin);
    println!("Total PnL:    ${:.2}", summary.total_pnl);
    println!("Overall ROI:  {:.2}%", summary.overall_roi);
}
