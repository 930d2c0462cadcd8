/// API route modules
pub mod health;
pub mod player;
pub mod playlists;
pub mod search;
pub mod stream;
