//! Page bookkeeping for incrementally loaded search results.
//!
//! [`PageTracker`] owns the state a paged list needs to decide whether the
//! next page may be requested:
//! - the current page number (1-based);
//! - whether every available result has already been fetched;
//! - whether a page request is in flight;
//! - a suppression window opened by a failed page request.
//!
//! The tracker never sleeps. Callers pass the current instant to every
//! time-sensitive method, so the cooldown can be driven by any clock.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First page number accepted by paged search APIs.
pub const FIRST_PAGE: u32 = 1;

/// Cooldown applied after a failed page request unless configured otherwise.
pub const DEFAULT_FAILURE_COOLDOWN: Duration = Duration::from_millis(2_000);

/// Outcome of asking the tracker for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAdmission {
    /// The request may proceed; the counter now points at `page`.
    Admitted {
        /// Page number to request.
        page: u32,
    },
    /// Every available result has been loaded.
    Exhausted,
    /// Another page request has not completed yet.
    InFlight,
    /// A recent failure opened the suppression window.
    Suppressed,
}

/// Serialisable view of the tracker for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProgress {
    /// Highest page successfully loaded (or being loaded).
    pub page: u32,
    /// Whether all results have been fetched.
    pub exhausted: bool,
}

/// Mutable pagination state for one result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTracker {
    current_page: u32,
    exhausted: bool,
    in_flight: bool,
    suppressed_at: Option<DateTime<Utc>>,
    cooldown: Duration,
}

impl Default for PageTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_COOLDOWN)
    }
}

impl PageTracker {
    /// Build a tracker positioned on the first page.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use pagination::{PageTracker, FIRST_PAGE};
    ///
    /// let tracker = PageTracker::new(Duration::from_millis(500));
    /// assert_eq!(tracker.current_page(), FIRST_PAGE);
    /// assert!(!tracker.is_exhausted());
    /// ```
    #[must_use]
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            current_page: FIRST_PAGE,
            exhausted: false,
            in_flight: false,
            suppressed_at: None,
            cooldown,
        }
    }

    /// Return to the first page for a fresh result list.
    ///
    /// The suppression window is left untouched: a cooldown started by a
    /// failed request keeps running across list resets.
    pub const fn reset(&mut self) {
        self.current_page = FIRST_PAGE;
        self.exhausted = false;
        self.in_flight = false;
    }

    /// Current page number.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Whether every available result has been loaded.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a page request is awaiting completion.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Configured failure cooldown.
    #[must_use]
    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a failure suppression window is open at `now`.
    #[must_use]
    pub fn is_suppressed(&self, now: DateTime<Utc>) -> bool {
        self.suppressed_at
            .is_some_and(|opened_at| !is_cooldown_elapsed(opened_at, now, self.cooldown))
    }

    /// Reporting view of the tracker.
    #[must_use]
    pub const fn progress(&self) -> PageProgress {
        PageProgress {
            page: self.current_page,
            exhausted: self.exhausted,
        }
    }

    /// Attempt to move to the next page.
    ///
    /// On admission the counter is incremented and the tracker is marked in
    /// flight until [`record_page_loaded`](Self::record_page_loaded) or
    /// [`record_page_failed`](Self::record_page_failed) is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use pagination::{PageAdmission, PageTracker};
    ///
    /// let mut tracker = PageTracker::default();
    /// let now = Utc::now();
    /// assert_eq!(tracker.admit_next_page(now), PageAdmission::Admitted { page: 2 });
    /// assert_eq!(tracker.admit_next_page(now), PageAdmission::InFlight);
    /// ```
    pub fn admit_next_page(&mut self, now: DateTime<Utc>) -> PageAdmission {
        if self.exhausted {
            return PageAdmission::Exhausted;
        }
        if self.in_flight {
            return PageAdmission::InFlight;
        }
        if self.is_suppressed(now) {
            return PageAdmission::Suppressed;
        }

        self.suppressed_at = None;
        self.current_page = self.current_page.saturating_add(1);
        self.in_flight = true;
        PageAdmission::Admitted {
            page: self.current_page,
        }
    }

    /// Record a successfully loaded page.
    ///
    /// `loaded` is the number of results accumulated so far across all pages
    /// and `total` the server-reported result count. The list is exhausted
    /// once `loaded >= total`.
    pub fn record_page_loaded(&mut self, loaded: usize, total: u32) {
        self.in_flight = false;
        self.exhausted = u32::try_from(loaded).map_or(true, |loaded| loaded >= total);
    }

    /// Record a failed page request.
    ///
    /// The counter rolls back to its value before the attempt and the
    /// suppression window opens at `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use pagination::{PageAdmission, PageTracker};
    ///
    /// let mut tracker = PageTracker::default();
    /// let now = Utc::now();
    /// let _ = tracker.admit_next_page(now);
    /// tracker.record_page_failed(now);
    /// assert_eq!(tracker.current_page(), 1);
    /// assert_eq!(tracker.admit_next_page(now), PageAdmission::Suppressed);
    /// ```
    pub fn record_page_failed(&mut self, now: DateTime<Utc>) {
        self.in_flight = false;
        self.current_page = self.current_page.saturating_sub(1).max(FIRST_PAGE);
        self.suppressed_at = Some(now);
    }
}

fn is_cooldown_elapsed(opened_at: DateTime<Utc>, now: DateTime<Utc>, cooldown: Duration) -> bool {
    // An unrepresentable cooldown is treated as elapsed so pagination cannot
    // stay blocked forever.
    let Ok(cooldown) = chrono::Duration::from_std(cooldown) else {
        return true;
    };

    now >= opened_at + cooldown
}
