//! Domain logic for PeerSlot: weekly availability slots and the match
//! requests peers exchange over them.
//!
//! Everything here is pure and synchronous. Persistence lives in
//! `peerslot-db`, the HTTP surface in `peerslot-api`.

pub mod errors;
pub mod models;
pub mod rules;
pub mod time;
