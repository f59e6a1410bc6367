//! Draft and bracket engines plus rankings helpers.

mod bracket;
mod draft;
mod rankings;

pub use bracket::{champion, finals_status, seed_bracket, set_match_winner};
pub use draft::{advance, initialize, pick, pick_into_slot, remove_pick, reset};
pub use rankings::{generate_test_rankings, prepare_rankings};
