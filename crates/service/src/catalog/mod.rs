//! Game catalog: filtering, rating aggregation and game administration.
//!
//! Follows the repository/service split used by `auth`: `CatalogRepository`
//! abstracts persistence, `CatalogService` holds the business rules.

pub mod domain;
pub mod filters;
pub mod ratings;
pub mod repository;
pub mod service;

pub use filters::{GameFilters, GameQuery, PlayersFilter, SortOrder};
pub use service::CatalogService;
