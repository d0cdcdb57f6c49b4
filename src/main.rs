use clap::Parser;
use larder::{
    cli::{commands, Cli, Commands},
    config::Settings,
    matcher::search::SearchOptions,
    Result,
};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,larder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;
    debug!("Loaded settings: {:?}", settings.oracle);

    match cli.command {
        Commands::Parse { input } => {
            commands::parse(input.as_deref())?;
        }
        Commands::Decode { field } => {
            commands::decode(&field)?;
        }
        Commands::Tags { recipes } => {
            commands::tags(&recipes)?;
        }
        Commands::Search {
            query,
            recipes,
            mode,
            min_score,
            concurrency,
        } => {
            let options = SearchOptions {
                concurrency: concurrency.unwrap_or(settings.search.concurrency),
                min_score: min_score.unwrap_or(settings.search.min_score),
            };
            commands::search(&settings, &query, &recipes, mode.into(), options).await?;
        }
        Commands::Match {
            query,
            target,
            mode,
        } => {
            commands::compare(&settings, &query, &target, mode.into()).await?;
        }
        Commands::Vocab { path } => {
            let path = path.unwrap_or_else(|| settings.vocabulary.tags_path.clone());
            commands::vocab(&path)?;
        }
    }

    Ok(())
}
