//! OMDb outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `SearchRemoteDataSource` port.

mod dto;
mod http_source;

pub use http_source::OmdbHttpSource;
