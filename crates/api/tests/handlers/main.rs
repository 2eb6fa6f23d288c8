#[path = "../test_utils.rs"]
mod test_utils;

mod peer_test;
mod slot_test;
