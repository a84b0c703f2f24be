//! Search OMDb from the command line and print the accumulated result list.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use movie_search::config::MovieSearchSettings;
use movie_search::domain::{
    MessageKey, Movie, SearchRepositoryService, SearchSession, SearchSnapshot, SearchState,
};
use movie_search::outbound::omdb::OmdbHttpSource;
use ortho_config::OrthoConfig;
use pagination::PageProgress;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `movie-search` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "movie-search",
    about = "Search OMDb for movies and print every loaded page",
    version
)]
struct CliArgs {
    /// Search text.
    query: String,
    /// Maximum number of pages to load.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,
    /// Print the result as JSON instead of one line per movie.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchReport<'a> {
    query: &'a str,
    state: SearchState,
    progress: PageProgress,
    movies: &'a [Movie],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorReport<'a>>,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    key: MessageKey,
    message: &'a str,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let settings = MovieSearchSettings::load_from_iter([OsString::from("movie-search")])
        .map_err(|error| eyre!("load configuration: {error}"))?;
    let source = OmdbHttpSource::new(settings.base_url()?, settings.api_key(), settings.timeout())
        .wrap_err("build HTTP client")?;
    let repository = Arc::new(SearchRepositoryService::new(Arc::new(source)));
    let session = SearchSession::new(
        repository,
        Arc::new(DefaultClock),
        settings.pagination_cooldown(),
    );

    let mut snapshot = session.search(args.query.as_str()).await;
    if snapshot.state == SearchState::Error {
        info!(query = %args.query, "first page failed; retrying once");
        snapshot = session.retry().await;
    }
    if snapshot.state == SearchState::Success {
        snapshot =
            load_remaining_pages(&session, snapshot, args.pages, settings.pagination_cooldown())
                .await;
    }

    print_report(&args, &snapshot)?;
    match (&snapshot.state, &snapshot.error) {
        (SearchState::Error, Some(error)) => Err(eyre!("{}", error.user_message())),
        _ => Ok(()),
    }
}

async fn load_remaining_pages(
    session: &SearchSession,
    mut snapshot: SearchSnapshot,
    max_pages: u32,
    cooldown: Duration,
) -> SearchSnapshot {
    let mut retried = false;
    while snapshot.progress.page < max_pages && !snapshot.progress.exhausted {
        let before = snapshot.progress.page;
        snapshot = session.load_next_page().await;
        if snapshot.progress.page > before {
            continue;
        }
        if retried {
            warn!(page = before.saturating_add(1), "next page failed again; stopping");
            break;
        }
        // The session refuses pages until the cooldown has elapsed.
        retried = true;
        tokio::time::sleep(cooldown).await;
    }
    snapshot
}

fn print_report(args: &CliArgs, snapshot: &SearchSnapshot) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if args.json {
        let report = SearchReport {
            query: &args.query,
            state: snapshot.state,
            progress: snapshot.progress,
            movies: &snapshot.movies,
            error: snapshot.error.as_ref().map(|error| ErrorReport {
                key: error.message_key(),
                message: error.user_message(),
            }),
        };
        serde_json::to_writer_pretty(&mut stdout, &report).wrap_err("encode JSON report")?;
        writeln!(stdout)?;
        return Ok(());
    }

    for movie in &snapshot.movies {
        writeln!(
            stdout,
            "{}\t{}\t{}\t{}",
            movie.imdb_id, movie.year, movie.kind, movie.title
        )?;
    }
    if let (SearchState::Success, Some(error)) = (snapshot.state, &snapshot.error) {
        writeln!(io::stderr(), "warning: {}", error.user_message())?;
    }
    Ok(())
}
