use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use challengeme::cli::Cli;
use challengeme::config::Config;
use challengeme::console::Console;
use challengeme::commands;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "challengeme=warn,challengeme_core=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::resolve(cli.db, cli.defaults_dir)?;
    let db = config.open_database()?;

    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout());
    commands::execute(&cli.command, &db, &mut console, &mut rand::thread_rng())?;

    db.close()?;
    Ok(())
}
