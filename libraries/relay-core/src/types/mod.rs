//! Domain types

mod ids;
mod player_record;
mod playlist;
mod track;

pub use ids::ChatId;
pub use player_record::{
    now, PlayerRecord, DEFAULT_SPEED, DEFAULT_VOLUME, MAX_SPEED, MAX_VOLUME, MIN_SPEED, MIN_VOLUME,
};
pub use playlist::{NewPlaylist, Playlist};
pub use track::Track;
