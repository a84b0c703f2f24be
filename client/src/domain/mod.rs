//! Domain records, error taxonomy, and search orchestration.
//!
//! Purpose: keep the search flow independent of HTTP. Adapters in
//! `crate::outbound` implement the traits in [`ports`]; everything above them
//! only sees [`SearchData`] and [`RemoteError`].
//!
//! Public surface:
//! - [`Movie`], [`SearchData`]: UI-facing search records.
//! - [`RemoteError`], [`RemoteResult`], [`safe_api_call`]: classified outcome
//!   of every remote call.
//! - [`SearchRepositoryService`]: turns a logical `false` reply into an error.
//! - [`SearchSession`]: observable result list with pagination control.

pub mod movie;
pub mod ports;
pub mod remote_error;
pub mod search_repository_service;
pub mod search_session;

pub use self::movie::{Movie, SearchData};
pub use self::remote_error::{
    DEFAULT_SERVER_MESSAGE, MessageKey, RemoteError, RemoteResult, extract_server_message,
    safe_api_call,
};
pub use self::search_repository_service::SearchRepositoryService;
pub use self::search_session::{SearchSession, SearchSnapshot, SearchState};
