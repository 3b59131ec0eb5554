//! Data model and on-disk record format for the DOS game launcher catalog.
//!
//! This crate defines the catalog entry types, the hardware capability bit
//! sets, the genre code table, and the fixed-width binary codec for
//! GAMES.DAT and LBMAP.DAT records, without any storage dependencies.
//! Consumers use these types directly for display or pass them to
//! `dosdex-store` for persistence.

pub mod genre;
pub mod record;
pub mod titles;
pub mod types;

pub use genre::{GENRE_NAMES, genre_code_to_name, genre_name_to_code, validate_genre_code};
pub use record::{
    CodecError, GAME_RECORD_LEN, MAP_RECORD_LEN, decode_game, decode_mapping, encode_game,
    encode_mapping,
};
pub use titles::{
    DEFAULT_AMBIGUITY_MARGIN, DEFAULT_MATCH_THRESHOLD, normalize_title, title_similarity,
};
pub use types::{FmSound, GameEntry, Graphics, LegacySound, MapEntry, MidiSound};
