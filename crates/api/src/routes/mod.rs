pub mod auth;
pub mod health;
pub mod match_request;
pub mod peer;
pub mod slot;
