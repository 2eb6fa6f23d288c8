pub mod match_request;
pub mod slot;
pub mod user;
