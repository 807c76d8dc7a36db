use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;

use backend::{print_json, Backend, Position};

#[derive(Debug, Parser)]
#[command(name = "esg_cli")]
struct Args {
    /// Talk to a running API instead of the local dataset and portfolio file.
    #[arg(long, env = "ESG_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fuzzy search over name, industry group and country. Empty lists everything.
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Derived ESG insight for one company (exact name).
    Show { name: String },
    /// Side-by-side comparison of up to four companies.
    Compare {
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
    #[command(subcommand)]
    Portfolio(PortfolioCommand),
}

#[derive(Debug, Subcommand)]
enum PortfolioCommand {
    List,
    Add {
        name: String,
        #[arg(long)]
        shares: Option<f64>,
        #[arg(long)]
        avg_price: Option<f64>,
        #[arg(long)]
        current_price: Option<f64>,
    },
    Remove { name: String },
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = esg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if args.api_url.is_some() {
        settings.api_url = args.api_url.clone();
    }

    let backend = if settings.api_url.is_some() {
        Backend::remote(&settings)?
    } else {
        Backend::local(&settings).await?
    };

    if let Err(err) = run(&backend, args.command).await {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %format!("{err:#}"), "command failed");
        return Err(err);
    }
    Ok(())
}

async fn run(backend: &Backend, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search { query } => {
            let found = backend.search(&query).await?;
            tracing::info!(query = %query, results = found.len(), "search");
            print_json(&found)
        }
        Command::Show { name } => print_json(&backend.show(&name).await?),
        Command::Compare { names } => print_json(&backend.compare(&names).await?),
        Command::Portfolio(PortfolioCommand::List) => print_json(&backend.portfolio().await?),
        Command::Portfolio(PortfolioCommand::Add {
            name,
            shares,
            avg_price,
            current_price,
        }) => {
            let position = Position {
                shares,
                avg_price,
                current_price,
            };
            print_json(&backend.add(&name, position).await?)
        }
        Command::Portfolio(PortfolioCommand::Remove { name }) => {
            print_json(&backend.remove(&name).await?)
        }
        Command::Portfolio(PortfolioCommand::Summary) => print_json(&backend.summary().await?),
    }
}

fn init_sentry(settings: &esg_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
