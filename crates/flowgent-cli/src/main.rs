mod leads;
mod score;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowgent_scoring::Temperature;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flowgent-cli")]
#[command(about = "Flowgent lead scoring command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify a single lead without touching the database
    Score {
        /// Business website URL; omit when the business has none
        #[arg(long)]
        website: Option<String>,
        /// Business category (e.g. "Real Estate")
        #[arg(long)]
        category: Option<String>,
        /// City the business operates in
        #[arg(long)]
        city: Option<String>,
        /// Show the sub-scores behind the result
        #[arg(long)]
        explain: bool,
        /// Print JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Classify a lead and store it
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Import leads from a YAML file
    Import {
        /// Path to a YAML file with a top-level `leads:` list
        path: PathBuf,
    },
    /// Ingest listings from the mock business scraper
    Scrape {
        #[arg(long)]
        category: String,
        #[arg(long)]
        city: String,
        /// Number of listings to generate (capped at 50)
        #[arg(long, default_value = "10")]
        count: usize,
        /// Print the scored listings without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored leads, highest score first
    Leads {
        /// Only show leads with this temperature (hot, warm, cold)
        #[arg(long)]
        temperature: Option<Temperature>,
        /// Maximum number of leads to show
        #[arg(long, default_value = "20", value_parser = clap::value_parser!(i64).range(1..))]
        limit: i64,
    },
    /// Change a stored lead's website, category or city and rescore it
    Update {
        /// Lead id as printed by `add`
        id: uuid::Uuid,
        #[arg(long, conflicts_with = "no_website")]
        website: Option<String>,
        /// Record that the business has no website
        #[arg(long)]
        no_website: bool,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Run one enrichment cycle in the foreground
    Enrich {
        /// Override the configured batch size
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        None => println!("flowgent-cli: no command given; run with --help for usage"),
        Some(Commands::Score {
            website,
            category,
            city,
            explain,
            json,
        }) => {
            init_tracing("warn")?;
            score::run_score(website, category, city, explain, json)?;
        }
        Some(Commands::Scrape {
            category,
            city,
            count,
            dry_run: true,
        }) => {
            init_tracing("warn")?;
            leads::run_scrape_preview(&category, &city, count);
        }
        Some(Commands::Scrape {
            category,
            city,
            count,
            dry_run: false,
        }) => {
            let (_, pool) = connect().await?;
            leads::run_scrape(&pool, &category, &city, count).await;
        }
        Some(Commands::Add {
            name,
            website,
            category,
            city,
            phone,
            email,
        }) => {
            let (_, pool) = connect().await?;
            let new = flowgent_core::NewLead {
                business_name: name,
                website_url: website,
                category,
                city,
                phone,
                email,
            };
            leads::run_add(&pool, new).await?;
        }
        Some(Commands::Import { path }) => {
            let (_, pool) = connect().await?;
            leads::run_import(&pool, &path).await?;
        }
        Some(Commands::Update {
            id,
            website,
            no_website,
            category,
            city,
        }) => {
            let (_, pool) = connect().await?;
            let changes = leads::AttributeChanges {
                website: if no_website { Some(None) } else { website.map(Some) },
                category,
                city,
            };
            leads::run_update(&pool, id, changes).await?;
        }
        Some(Commands::Leads { temperature, limit }) => {
            let (_, pool) = connect().await?;
            leads::run_list(&pool, temperature, limit).await?;
        }
        Some(Commands::Enrich { limit }) => {
            let (mut config, pool) = connect().await?;
            if let Some(limit) = limit {
                config.agent_batch_size = limit;
            }
            leads::run_enrich(pool, &config).await?;
        }
        Some(Commands::Db {
            command: DbCommands::Ping,
        }) => {
            let (_, pool) = connect().await?;
            let counts = flowgent_db::health_check(&pool).await?;
            println!(
                "database ok: {} lead(s), {} unprocessed",
                counts.total, counts.unprocessed
            );
        }
        Some(Commands::Db {
            command: DbCommands::Migrate,
        }) => {
            let (_, pool) = connect().await?;
            let applied = flowgent_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }

    Ok(())
}

/// Load configuration, start logging, and open the database pool.
async fn connect() -> anyhow::Result<(flowgent_core::AppConfig, sqlx::PgPool)> {
    let config = flowgent_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    let pool_config = flowgent_db::PoolConfig::from_app_config(&config);
    let pool = flowgent_db::connect_pool(&config.database_url, pool_config).await?;
    Ok((config, pool))
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
