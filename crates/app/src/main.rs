use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use services::{AppServices, CatalogSource, Clock, FileCatalogSource, HttpCatalogSource};
use storage::Storage;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod driver;

use driver::Driver;

const DEFAULT_CATALOG: &str = "questions.json";
const DEFAULT_DATA_DIR: &str = ".practice";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    EmptyValue { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::EmptyValue { flag } => write!(f, "{flag} must not be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    let value = args.next().ok_or(ArgsError::MissingValue { flag })?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyValue { flag });
    }
    Ok(value)
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p practice -- [--catalog <url|path>] [--data-dir <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --catalog {DEFAULT_CATALOG}");
    eprintln!("  --data-dir {DEFAULT_DATA_DIR}");
    eprintln!();
    eprintln!("A catalog starting with http:// or https:// is fetched from");
    eprintln!("<url>/questions.json unless the url already names a .json file.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PRACTICE_CATALOG, PRACTICE_DATA_DIR, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    catalog: String,
    data_dir: PathBuf,
}

enum Parsed {
    Run(Args),
    Help,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Parsed, ArgsError> {
        let mut catalog =
            std::env::var("PRACTICE_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG.into());
        let mut data_dir = std::env::var("PRACTICE_DATA_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--catalog" => catalog = require_value(args, "--catalog")?,
                "--data-dir" => data_dir = PathBuf::from(require_value(args, "--data-dir")?),
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self { catalog, data_dir }))
    }
}

fn catalog_source(location: &str) -> Arc<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpCatalogSource::new(location))
    } else {
        Arc::new(FileCatalogSource::new(location))
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "practice=info,services=info,storage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Parsed::Run(args)) => args,
        Ok(Parsed::Help) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            return Err(err.into());
        }
    };

    init_tracing();
    tracing::info!(catalog = %parsed.catalog, data_dir = %parsed.data_dir.display(), "starting practice session");

    // Keep storage and catalog wiring in the binary so services stay backend-agnostic.
    let storage = Storage::file(&parsed.data_dir)?;
    let mut services = AppServices::new(
        &storage,
        Clock::default_clock(),
        catalog_source(&parsed.catalog),
    );

    // An unavailable catalog is not fatal: the session shows the empty state.
    if let Err(err) = services.load_catalog().await {
        eprintln!("Could not load questions from {}: {err}", parsed.catalog);
    }

    Driver::new(services).run().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
