//! Service layer providing the marketplace's business operations on top of models.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod auth;
pub mod catalog;
pub mod review_service;
pub mod category_service;
pub mod wishlist_service;
pub mod profile_service;
pub mod stats_service;
#[cfg(test)]
pub mod test_support;
