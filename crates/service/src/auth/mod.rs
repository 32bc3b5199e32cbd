//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login and token verification live here; the HTTP layer only
//! extracts tokens and maps errors.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
