use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};

mod app;
mod config;
mod db;
mod display;
mod error;
mod models;
mod news;
mod services;

use app::App;
use config::Config;
use error::Result;
use models::ArticleQuery;
use services::ExportFormat;

#[derive(Parser, Debug)]
#[command(name = "news-aggregator", author, version, about = "News Aggregator CLI", long_about = None)]
struct Cli {
    /// Use this SQLite file instead of the configured one
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch news from the search API and store new articles
    Fetch {
        /// Search term (defaults to the configured query)
        #[arg(long)]
        query: Option<String>,
    },
    /// List stored articles
    List {
        /// Title contains
        #[arg(long)]
        keyword: Option<String>,
        /// Source name contains
        #[arg(long)]
        source: Option<String>,
        /// Published on or after (YYYY-MM-DD)
        #[arg(long)]
        from_date: Option<NaiveDate>,
        /// Published on or before (YYYY-MM-DD)
        #[arg(long)]
        to_date: Option<NaiveDate>,
    },
    /// Export every stored article
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = Config::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let app = App::new(&config).await?;
    let result = run(&app, command).await;
    app.close().await?;

    result
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Fetch { query } => {
            let query = query.unwrap_or_else(|| app.default_query.clone());
            let outcome = app.fetch(&query).await?;
            tracing::info!(
                new = outcome.count(),
                fallback = outcome.is_fallback(),
                "Fetch finished"
            );
            println!("{}", outcome);
        }

        Commands::List {
            keyword,
            source,
            from_date,
            to_date,
        } => {
            let articles = app
                .list(ArticleQuery {
                    keyword,
                    source,
                    from_date,
                    to_date,
                })
                .await?;
            println!("{}", display::article_table(&articles));
        }

        Commands::Export { format } => match app.export(format).await? {
            Some(path) => println!("Exported to {}", path.display()),
            None => println!("No data to export."),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_filters() {
        let cli = Cli::try_parse_from([
            "news-aggregator",
            "list",
            "--keyword",
            "chip",
            "--source",
            "Reuters",
            "--from-date",
            "2024-01-01",
            "--to-date",
            "2024-01-31",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::List {
                keyword,
                source,
                from_date,
                to_date,
            }) => {
                assert_eq!(keyword.as_deref(), Some("chip"));
                assert_eq!(source.as_deref(), Some("Reuters"));
                assert_eq!(from_date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(to_date, NaiveDate::from_ymd_opt(2024, 1, 31));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates_and_formats() {
        assert!(Cli::try_parse_from(["news-aggregator", "list", "--from-date", "01/02/2024"]).is_err());
        assert!(Cli::try_parse_from(["news-aggregator", "export", "pdf"]).is_err());
    }

    #[test]
    fn parses_export_and_fetch() {
        let cli = Cli::try_parse_from(["news-aggregator", "export", "excel"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Export {
                format: ExportFormat::Excel
            })
        ));

        let cli = Cli::try_parse_from(["news-aggregator", "--db", "x.db", "fetch", "--query", ""]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("x.db"));
        match cli.command {
            Some(Commands::Fetch { query }) => assert_eq!(query.as_deref(), Some("")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["news-aggregator"]).unwrap();
        assert!(cli.command.is_none());
    }
}
