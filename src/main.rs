use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use player_stats::api::state::AppState;
use player_stats::api::{build_router, cors_layer};
use player_stats::calculate::{parse_date, FilterConfig, FilteredPool, GridSortKey, SortDirection};
use player_stats::config::AppConfig;
use player_stats::dataset::Dataset;
use player_stats::models::{
    finish_ordinal, get_stat_value, numeric_stat, RankableStat, StatId, StatValue, GRID_STATS,
};
use player_stats::storage::DatasetReader;

#[derive(Parser)]
#[command(name = "player-stats")]
#[command(about = "Tournament-series player statistics with filtered leaderboards")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Dataset file (overrides the configured path)
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Find players by name
    Search {
        term: String,
    },

    /// Show a player's stats, ranks and event history
    Show {
        id: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Top players by a rankable stat
    Leaderboard {
        stat: String,

        /// Number of entries
        #[arg(long)]
        limit: Option<usize>,

        /// Also show this player's rank
        #[arg(long)]
        player: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// A single player's rank by a stat
    Rank {
        id: String,
        stat: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Rank grid of qualified players
    Qualified {
        /// `name`, a stat id, or `rank:<stat id>`
        #[arg(long)]
        sort: Option<String>,

        #[arg(long, value_parser = ["asc", "desc"])]
        order: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Results of one event
    Event {
        code: String,
    },

    /// List the stat catalogue
    Stats,
}

/// Pool filters shared by the ranking commands.
#[derive(Args, Debug, Default)]
struct FilterArgs {
    #[arg(long)]
    min_events: Option<u32>,

    #[arg(long)]
    max_events: Option<u32>,

    #[arg(long)]
    min_day2s: Option<u32>,

    #[arg(long)]
    min_top8s: Option<u32>,

    /// Only players with at least one top 8
    #[arg(long)]
    has_top8: bool,

    /// Only qualified players
    #[arg(long)]
    qualified_only: bool,

    /// Event format (repeatable, any match)
    #[arg(long = "format")]
    formats: Vec<String>,

    /// Earliest event date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Latest event date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl FilterArgs {
    fn to_filter_config(&self) -> Result<FilterConfig> {
        let config = FilterConfig {
            min_events: self.min_events,
            max_events: self.max_events,
            min_day2s: self.min_day2s,
            min_top8s: self.min_top8s,
            has_top8: self.has_top8,
            qualified_only: self.qualified_only,
            formats: self.formats.iter().cloned().collect(),
            start_date: self.from.as_deref().map(parse_date).transpose()?,
            end_date: self.to.as_deref().map(parse_date).transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dataset) = &cli.dataset {
        config.dataset_path = dataset.clone();
    }
    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let (plain, json) = if cli.json_logs {
        (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
    } else {
        (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();

    tracing::debug!("Starting player-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let cors = cors_layer(&config.server.cors_origin)
                .with_context(|| format!("Invalid CORS origin {:?}", config.server.cors_origin))?;
            let state = AppState::new(dataset, config.leaderboard.clone());
            let app = build_router(state).layer(cors);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Search { term } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let players = dataset.search(&term);

            for player in &players {
                let marker = if player.is_qualified() { "*" } else { " " };
                let events = numeric_stat(player, StatId::Events)
                    .map(|n| StatValue::Number(n).to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>8} {} {:<32} {:>4} events",
                    player.id.as_str(),
                    marker,
                    player.full_name(),
                    events
                );
            }
            println!("\n{} player(s) matching {:?}", players.len(), term);
        }
        Commands::Show { id, filters } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let filters = filters.to_filter_config()?;
            show_player(&dataset, &id, &filters)?;
        }
        Commands::Leaderboard {
            stat,
            limit,
            player,
            filters,
        } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let stat: RankableStat = stat.parse()?;
            let filters = filters.to_filter_config()?;
            let limit = config.leaderboard.limit(limit);

            let pool = FilteredPool::new(dataset.players(), &filters);
            let ranking = pool.ranking(stat);

            println!("=== {} ===", stat.id().label());
            println!(
                "Pool: {} players, {} ranked\n",
                pool.len(),
                ranking.pool_size()
            );
            for entry in ranking.top(limit) {
                println!(
                    "{:>4}. {:<32} {:>10}",
                    entry.rank,
                    entry.player.full_name(),
                    StatValue::Number(entry.value).display_for(stat.id())
                );
            }

            if let Some(id) = player {
                let player = dataset
                    .get(&id)
                    .with_context(|| format!("Player {} not found", id))?;
                match ranking.rank_of(player) {
                    Some(position) => println!(
                        "\n{} is #{} of {}",
                        player.full_name(),
                        position.rank,
                        position.pool_size
                    ),
                    None => println!("\n{} is not ranked in this pool", player.full_name()),
                }
            }
        }
        Commands::Rank { id, stat, filters } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let stat: RankableStat = stat.parse()?;
            let filters = filters.to_filter_config()?;

            let player = dataset
                .get(&id)
                .with_context(|| format!("Player {} not found", id))?;
            let pool = FilteredPool::new(dataset.players(), &filters);

            match pool.rank_of(player, stat) {
                Some(position) => println!(
                    "{}: #{} of {} by {} ({}, top {:.1}%)",
                    player.full_name(),
                    position.rank,
                    position.pool_size,
                    stat.id().label(),
                    get_stat_value(player, stat.id())
                        .map(|v| v.display_for(stat.id()))
                        .unwrap_or_default(),
                    position.percentile()
                ),
                None => println!(
                    "{} is not ranked by {} in this pool",
                    player.full_name(),
                    stat.id().label()
                ),
            }
        }
        Commands::Qualified {
            sort,
            order,
            filters,
        } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let mut filters = filters.to_filter_config()?;
            filters.qualified_only = true;

            let stats: Vec<RankableStat> = GRID_STATS
                .iter()
                .filter_map(|&stat| RankableStat::try_from(stat).ok())
                .collect();
            let pool = FilteredPool::new(dataset.players(), &filters);
            let mut grid = pool.rank_grid(&stats);

            if let Some(sort) = sort {
                let key: GridSortKey = sort.parse()?;
                if let GridSortKey::Rank(stat) = key {
                    if !grid.has_column(stat) {
                        bail!("No rank column for stat: {}", stat);
                    }
                }
                let direction = match order.as_deref() {
                    Some("asc") => SortDirection::Asc,
                    Some(_) => SortDirection::Desc,
                    None => key.default_direction(),
                };
                grid.sort_by(key, direction);
            }

            for (i, stat) in stats.iter().enumerate() {
                println!("  [{:>2}] {}", i + 1, stat.id().label());
            }
            println!();

            print!("{:<32}", "Player");
            for i in 0..stats.len() {
                print!("{:>6}", format!("[{}]", i + 1));
            }
            println!();

            for row in grid.rows() {
                print!("{:<32}", row.player.full_name());
                for rank in &row.ranks {
                    match rank {
                        Some(rank) => print!("{:>6}", rank),
                        None => print!("{:>6}", "-"),
                    }
                }
                println!();
            }
            println!("\n{} qualified player(s)", grid.rows().len());
        }
        Commands::Event { code } => {
            let dataset = load_dataset(&config.dataset_path)?;
            let details = dataset
                .event_results(&code)
                .with_context(|| format!("No results for event {}", code))?;

            println!(
                "=== {} ({}, {}) ===",
                details.event_code, details.format, details.date
            );
            for result in &details.results {
                println!(
                    "{:<12} {:<32} {:<10} {}",
                    finish_ordinal(result.finish),
                    result.player_name,
                    result.event.record.as_deref().unwrap_or("-"),
                    result.event.deck.as_deref().unwrap_or("")
                );
            }
            println!("\n{} player(s)", details.total_players);
        }
        Commands::Stats => {
            for stat in StatId::ALL {
                println!(
                    "{:<22} {:<26} {}",
                    stat.as_str(),
                    stat.label(),
                    if stat.is_rankable() { "rankable" } else { "" }
                );
            }
        }
    }

    Ok(())
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    DatasetReader::new(path)
        .read()
        .with_context(|| format!("Failed to load dataset from {:?}", path))
}

fn show_player(dataset: &Dataset, id: &str, filters: &FilterConfig) -> Result<()> {
    let Some(player) = dataset.get(id) else {
        bail!("Player {} not found", id);
    };
    let pool = FilteredPool::new(dataset.players(), filters);

    println!("=== {} ({}) ===", player.full_name(), player.id);
    if player.is_qualified() {
        println!("Qualified");
    }
    if !pool.contains(player) {
        println!("(not in the filtered pool)");
    }
    println!();

    for stat in StatId::ALL {
        let Some(value) = get_stat_value(player, stat) else {
            continue;
        };
        let rank = RankableStat::try_from(stat)
            .ok()
            .and_then(|rankable| pool.rank_of(player, rankable));

        match rank {
            Some(position) => println!(
                "{:<26} {:>10}   #{} of {}",
                stat.label(),
                value.display_for(stat),
                position.rank,
                position.pool_size
            ),
            None => println!("{:<26} {:>10}", stat.label(), value.display_for(stat)),
        }
    }

    let events = player.events_by_date();
    if !events.is_empty() {
        println!("\nEvents:");
        for event in events {
            println!(
                "  {} {:<8} {:<12} {:<12} {}",
                event.date,
                event.event_code,
                event.format,
                event.finish.map(finish_ordinal).unwrap_or_default(),
                event.deck.as_deref().unwrap_or("")
            );
        }
    }

    Ok(())
}
