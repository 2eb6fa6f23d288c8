pub mod match_request;
pub mod session;
pub mod slot;
pub mod user;
