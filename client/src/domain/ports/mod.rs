//! Domain ports and supporting types for the hexagonal boundary.

mod search_remote_data_source;
mod search_repository;

#[cfg(test)]
pub use search_remote_data_source::MockSearchRemoteDataSource;
pub use search_remote_data_source::{SearchRemoteDataSource, TransportFault};
#[cfg(test)]
pub use search_repository::MockSearchRepository;
pub use search_repository::SearchRepository;
