pub mod errors;
pub mod db;
pub mod category;
pub mod game;
pub mod profile;
pub mod user_credentials;
pub mod review;
pub mod wishlist;

#[cfg(test)]
mod tests;
