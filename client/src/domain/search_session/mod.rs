//! Search session: the observable result list and its pagination control.
//!
//! A session owns the state a results screen renders (lifecycle state, the
//! accumulated movies, the last surfaced error, whether a page is loading)
//! and the three commands that mutate it: [`SearchSession::search`],
//! [`SearchSession::load_next_page`], and [`SearchSession::retry`].
//!
//! State is published through a [`tokio::sync::watch`] channel and every
//! command also returns the snapshot it produced. The internal lock is never
//! held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use mockable::Clock;
use pagination::{FIRST_PAGE, PageAdmission, PageProgress, PageTracker};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::ports::SearchRepository;
use crate::domain::{Movie, RemoteError};

/// Lifecycle of the primary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// No search issued yet.
    Initial,
    /// First page requested.
    Loading,
    /// First page loaded; further pages may follow.
    Success,
    /// First page failed.
    Error,
}

/// Everything a presentation layer needs to render the result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Primary search state.
    pub state: SearchState,
    /// Results accumulated across loaded pages.
    pub movies: Vec<Movie>,
    /// Most recent surfaced error. A pagination failure sets this while
    /// `state` stays [`SearchState::Success`].
    pub error: Option<RemoteError>,
    /// Whether a next-page request is in flight.
    pub is_paginating: bool,
    /// Page counter and exhaustion.
    pub progress: PageProgress,
}

impl SearchSnapshot {
    fn initial(progress: PageProgress) -> Self {
        Self {
            state: SearchState::Initial,
            movies: Vec::new(),
            error: None,
            is_paginating: false,
            progress,
        }
    }
}

struct SessionState {
    pages: PageTracker,
    query: Option<String>,
    generation: u64,
}

/// Drives searches and pagination against a [`SearchRepository`].
pub struct SearchSession {
    repository: Arc<dyn SearchRepository>,
    clock: Arc<dyn Clock>,
    state: Mutex<SessionState>,
    snapshot: watch::Sender<SearchSnapshot>,
}

impl SearchSession {
    /// Build a session whose pagination pauses for `failure_cooldown` after a
    /// failed page.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let session = SearchSession::new(repository, Arc::new(DefaultClock), Duration::from_secs(2));
    /// let snapshot = session.search("jaws").await;
    /// ```
    pub fn new(
        repository: Arc<dyn SearchRepository>,
        clock: Arc<dyn Clock>,
        failure_cooldown: Duration,
    ) -> Self {
        let pages = PageTracker::new(failure_cooldown);
        let (snapshot, _) = watch::channel(SearchSnapshot::initial(pages.progress()));
        Self {
            repository,
            clock,
            state: Mutex::new(SessionState {
                pages,
                query: None,
                generation: 0,
            }),
            snapshot,
        }
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Query of the most recent search, if any.
    pub fn last_query(&self) -> Option<String> {
        self.lock_state().query.clone()
    }

    /// Whether a pagination failure is still within its cooldown.
    pub fn is_pagination_suppressed(&self) -> bool {
        self.lock_state().pages.is_suppressed(self.clock.utc())
    }

    /// Start a fresh search for `query` and load its first page.
    pub async fn search(&self, query: impl Into<String>) -> SearchSnapshot {
        let query = query.into();
        let generation = {
            let mut session = self.lock_state();
            session.generation = session.generation.wrapping_add(1);
            session.pages.reset();
            session.query = Some(query.clone());
            let progress = session.pages.progress();
            self.snapshot.send_modify(|snapshot| {
                snapshot.state = SearchState::Loading;
                snapshot.movies.clear();
                snapshot.error = None;
                snapshot.is_paginating = false;
                snapshot.progress = progress;
            });
            session.generation
        };

        debug!(%query, "requesting first page");
        let result = self.repository.search(&query, FIRST_PAGE).await;

        let mut session = self.lock_state();
        if session.generation != generation {
            debug!(%query, "discarding response for superseded search");
            return self.snapshot();
        }
        match result {
            Ok(data) => {
                session
                    .pages
                    .record_page_loaded(data.search_results.len(), data.total_results);
                let progress = session.pages.progress();
                self.snapshot.send_modify(|snapshot| {
                    snapshot.state = SearchState::Success;
                    snapshot.movies = data.search_results;
                    snapshot.progress = progress;
                });
            }
            Err(error) => {
                warn!(%query, error = %error, "search failed");
                self.snapshot.send_modify(|snapshot| {
                    snapshot.state = SearchState::Error;
                    snapshot.error = Some(error);
                });
            }
        }
        drop(session);
        self.snapshot()
    }

    /// Load the page after the current one and append its results.
    ///
    /// Does nothing when the list is exhausted, a page is already loading,
    /// the failure cooldown is running, or no search has succeeded yet. A
    /// failed page rolls the counter back, keeps the loaded list, and
    /// surfaces the error.
    pub async fn load_next_page(&self) -> SearchSnapshot {
        let (generation, query, page) = {
            let mut session = self.lock_state();
            if self.snapshot.borrow().state != SearchState::Success {
                debug!("next page ignored until a search succeeds");
                return self.snapshot();
            }
            let Some(query) = session.query.clone() else {
                return self.snapshot();
            };
            let page = match session.pages.admit_next_page(self.clock.utc()) {
                PageAdmission::Admitted { page } => page,
                refused => {
                    debug!(?refused, "next page not requested");
                    return self.snapshot();
                }
            };
            let progress = session.pages.progress();
            self.snapshot.send_modify(|snapshot| {
                snapshot.is_paginating = true;
                snapshot.progress = progress;
            });
            (session.generation, query, page)
        };

        debug!(%query, page, "requesting next page");
        let result = self.repository.search(&query, page).await;

        let mut session = self.lock_state();
        if session.generation != generation {
            debug!(%query, page, "discarding page for superseded search");
            return self.snapshot();
        }
        match result {
            Ok(data) => {
                let loaded = self
                    .snapshot
                    .borrow()
                    .movies
                    .len()
                    .saturating_add(data.search_results.len());
                session.pages.record_page_loaded(loaded, data.total_results);
                let progress = session.pages.progress();
                self.snapshot.send_modify(|snapshot| {
                    snapshot.movies.extend(data.search_results);
                    snapshot.error = None;
                    snapshot.is_paginating = false;
                    snapshot.progress = progress;
                });
            }
            Err(error) => {
                session.pages.record_page_failed(self.clock.utc());
                let progress = session.pages.progress();
                warn!(
                    %query,
                    page,
                    cooldown_ms = u64::try_from(session.pages.cooldown().as_millis()).unwrap_or(u64::MAX),
                    error = %error,
                    "next page failed; pagination paused"
                );
                self.snapshot.send_modify(|snapshot| {
                    snapshot.error = Some(error);
                    snapshot.is_paginating = false;
                    snapshot.progress = progress;
                });
            }
        }
        drop(session);
        self.snapshot()
    }

    /// Replay the last failed operation.
    ///
    /// Past the first page this asks for the next page again; otherwise it
    /// repeats the search for the last query. Without a prior search it does
    /// nothing.
    pub async fn retry(&self) -> SearchSnapshot {
        let (page, query) = {
            let session = self.lock_state();
            (session.pages.current_page(), session.query.clone())
        };

        if page > FIRST_PAGE {
            return self.load_next_page().await;
        }
        match query {
            Some(query) => self.search(query).await,
            None => self.snapshot(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
