pub mod club_manager;
pub mod services;
pub mod utils;

pub use club_manager::{ClubManager, LoadMetadata};
