//! End-to-end search flows against a local OMDb stand-in.
//!
//! Each test wires the real HTTP adapter, repository, and session together
//! and points them at a `mockito` server.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use mockito::{Matcher, Mock, Server, ServerGuard};
use movie_search::domain::ports::SearchRemoteDataSource;
use movie_search::domain::{
    DEFAULT_SERVER_MESSAGE, MessageKey, RemoteError, SearchRepositoryService, SearchSession,
    SearchState,
};
use movie_search::outbound::omdb::OmdbHttpSource;
use rstest::rstest;
use serde_json::json;

const API_KEY: &str = "test-key";
const SEARCH_FIXTURE: &str = include_str!("fixtures/search.json");
const EMPTY_FIXTURE: &str = include_str!("fixtures/search_empty.json");

fn source_for(base_url: &str) -> OmdbHttpSource {
    source_with_timeout(base_url, Duration::from_secs(5))
}

fn source_with_timeout(base_url: &str, timeout: Duration) -> OmdbHttpSource {
    let base_url = format!("{base_url}/").parse().expect("server url");
    OmdbHttpSource::new(base_url, API_KEY, timeout).expect("client should build")
}

fn session_for(server: &ServerGuard) -> SearchSession {
    let repository = SearchRepositoryService::new(Arc::new(source_for(&server.url())));
    SearchSession::new(
        Arc::new(repository),
        Arc::new(DefaultClock),
        Duration::from_millis(2_000),
    )
}

async fn mock_page(server: &mut ServerGuard, query: &str, page: u32, status: usize, body: &str) -> Mock {
    server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("s".into(), query.into()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
            Matcher::UrlEncoded("apikey".into(), API_KEY.into()),
        ]))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn numbered_page(range: std::ops::Range<usize>, total: usize) -> String {
    let movies: Vec<_> = range
        .map(|index| {
            json!({
                "Title": format!("Shark {index}"),
                "Year": "1999",
                "imdbID": format!("tt{index:07}"),
                "Type": "movie",
                "Poster": "N/A",
            })
        })
        .collect();
    json!({
        "Search": movies,
        "totalResults": total.to_string(),
        "Response": "True",
    })
    .to_string()
}

#[tokio::test]
async fn jaws_search_loads_every_result() {
    let mut server = Server::new_async().await;
    let mock = mock_page(&mut server, "jaws", 1, 200, SEARCH_FIXTURE).await;
    let session = session_for(&server);

    let snapshot = session.search("jaws").await;

    mock.assert_async().await;
    assert_eq!(snapshot.state, SearchState::Success);
    assert_eq!(snapshot.movies.len(), 4);
    assert_eq!(snapshot.movies[0].title, "The Making of 'Jaws 2'");
    assert_eq!(snapshot.movies[0].year, "2001");
    assert_eq!(snapshot.movies[1].imdb_id, "tt0073195");
    assert!(snapshot.progress.exhausted);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn unknown_title_surfaces_server_explanation() {
    let mut server = Server::new_async().await;
    let mock = mock_page(&mut server, "adkshaksj", 1, 200, EMPTY_FIXTURE).await;
    let session = session_for(&server);

    let snapshot = session.search("adkshaksj").await;

    mock.assert_async().await;
    assert_eq!(snapshot.state, SearchState::Error);
    assert!(snapshot.movies.is_empty());
    let error = snapshot.error.expect("error should be set");
    assert_eq!(error, RemoteError::application_failure("Movie not found!"));
    assert_eq!(error.user_message(), "Movie not found!");
}

#[rstest]
#[case::message_key(404, r#"{"message":"Not found"}"#, "Not found")]
#[case::error_key(500, r#"{"error":"Upstream exploded"}"#, "Upstream exploded")]
#[case::omdb_style_body(401, r#"{"Response":"False","Error":"Invalid API key!"}"#, DEFAULT_SERVER_MESSAGE)]
#[case::html_body(503, "<html>down</html>", DEFAULT_SERVER_MESSAGE)]
#[tokio::test]
async fn error_statuses_become_http_failures(
    #[case] status: u16,
    #[case] body: &str,
    #[case] expected_message: &str,
) {
    let mut server = Server::new_async().await;
    let _mock = mock_page(&mut server, "jaws", 1, usize::from(status), body).await;
    let source = source_for(&server.url());

    let error = source
        .search_movies("jaws", 1)
        .await
        .expect_err("status should fail");

    match &error {
        RemoteError::HttpFailure { code, message, .. } => {
            assert_eq!(*code, status);
            assert_eq!(message, expected_message);
        }
        other => panic!("expected HttpFailure, got {other:?}"),
    }
    assert_eq!(error.message_key(), MessageKey::HttpError);
}

#[tokio::test]
async fn malformed_payload_is_unclassified() {
    let mut server = Server::new_async().await;
    let _mock = mock_page(&mut server, "jaws", 1, 200, "{not json").await;
    let source = source_for(&server.url());

    let error = source
        .search_movies("jaws", 1)
        .await
        .expect_err("decode should fail");

    assert!(matches!(error, RemoteError::Unclassified { .. }), "got {error:?}");
}

#[tokio::test]
async fn refused_connection_is_an_io_failure() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        listener.local_addr().expect("local addr").port()
    };
    let source = source_for(&format!("http://127.0.0.1:{port}"));

    let error = source
        .search_movies("jaws", 1)
        .await
        .expect_err("nothing listens on the port");

    assert!(matches!(error, RemoteError::IoFailure { .. }), "got {error:?}");
    assert_eq!(error.message_key(), MessageKey::IoError);
}

#[tokio::test]
async fn silent_server_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    // Accept connections and hold them open without ever answering.
    let stalled = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    let source = source_with_timeout(
        &format!("http://127.0.0.1:{port}"),
        Duration::from_millis(500),
    );

    let error = source
        .search_movies("jaws", 1)
        .await
        .expect_err("server never replies");
    stalled.abort();

    assert!(matches!(error, RemoteError::TimedOut { .. }), "got {error:?}");
    assert_eq!(error.message_key(), MessageKey::TimedOut);
}

#[tokio::test]
async fn pages_accumulate_until_total_is_reached() {
    let mut server = Server::new_async().await;
    let first = mock_page(&mut server, "shark", 1, 200, &numbered_page(0..10, 12)).await;
    let second = mock_page(&mut server, "shark", 2, 200, &numbered_page(10..12, 12)).await;
    let session = session_for(&server);

    let loaded = session.search("shark").await;
    assert!(!loaded.progress.exhausted);

    let appended = session.load_next_page().await;
    let after_end = session.load_next_page().await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(appended.movies.len(), 12);
    assert_eq!(appended.movies[11].title, "Shark 11");
    assert!(appended.progress.exhausted);
    assert_eq!(after_end, appended);
}

#[tokio::test]
async fn failed_page_keeps_loaded_results_and_pauses() {
    let mut server = Server::new_async().await;
    let _first = mock_page(&mut server, "shark", 1, 200, &numbered_page(0..10, 30)).await;
    let second = mock_page(&mut server, "shark", 2, 500, r#"{"Message":"try later"}"#).await;
    let session = session_for(&server);
    session.search("shark").await;

    let failed = session.load_next_page().await;
    let paused = session.load_next_page().await;

    second.assert_async().await;
    assert_eq!(failed.state, SearchState::Success);
    assert_eq!(failed.movies.len(), 10);
    assert_eq!(failed.progress.page, 1);
    assert_eq!(
        failed.error.as_ref().map(RemoteError::user_message),
        Some("try later")
    );
    assert!(session.is_pagination_suppressed());
    assert_eq!(paused, failed);
}
