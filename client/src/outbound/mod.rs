//! Outbound adapters implementing domain ports.
//!
//! Adapters are thin translators between wire formats and domain records.
//! They contain no business logic.

pub mod omdb;
