pub mod auth;
pub mod match_request;
pub mod peer;
pub mod slot;
