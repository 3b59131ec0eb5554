//! Filter predicates over the catalog store.
//!
//! The launcher's browse menus are additive filters: every supplied
//! dimension must hold (AND), while the bits inside one capability mask are
//! alternatives (OR) — a title matches an FM mask if it supports *any* of
//! the requested cards. Unset dimensions are unconstrained.

use std::io::{Read, Seek, Write};

use dosdex_catalog::types::{FmSound, GameEntry, Graphics, LegacySound, MidiSound};

use crate::store::{GameStore, StoreError};

/// A composite filter over catalog entries. `Default` matches every live
/// entry.
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Case-insensitive substring of the publisher.
    pub publisher: Option<String>,
    /// Exact year text.
    pub year: Option<String>,
    /// Exact genre code.
    pub genre: Option<u8>,
    /// Any overlapping legacy sound bit qualifies.
    pub sound: Option<LegacySound>,
    /// Any overlapping FM bit qualifies.
    pub fm: Option<FmSound>,
    /// Any overlapping MIDI bit qualifies.
    pub midi: Option<MidiSound>,
    /// Any overlapping graphics bit qualifies.
    pub gfx: Option<Graphics>,
    /// Only titles that run without removable media.
    pub no_removable_media: bool,
    /// Include tombstoned entries (skipped by default).
    pub include_deleted: bool,
}

impl GameFilter {
    /// Whether `entry` satisfies every supplied dimension.
    pub fn matches(&self, entry: &GameEntry) -> bool {
        if entry.deleted && !self.include_deleted {
            return false;
        }
        if let Some(needle) = &self.title {
            if !contains_ignore_case(&entry.title, needle) {
                return false;
            }
        }
        if let Some(needle) = &self.publisher {
            if !contains_ignore_case(&entry.publisher, needle) {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if entry.year != *year {
                return false;
            }
        }
        if let Some(genre) = self.genre {
            if entry.genre_code != genre {
                return false;
            }
        }
        if let Some(mask) = self.sound {
            if !entry.sound_flags.intersects(mask) {
                return false;
            }
        }
        if let Some(mask) = self.fm {
            if !entry.fm_flags.intersects(mask) {
                return false;
            }
        }
        if let Some(mask) = self.midi {
            if !entry.midi_flags.intersects(mask) {
                return false;
            }
        }
        if let Some(mask) = self.gfx {
            if !entry.gfx_flags.intersects(mask) {
                return false;
            }
        }
        if self.no_removable_media && entry.requires_cd {
            return false;
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Lazily yield the `(position, entry)` pairs matching `filter`.
///
/// Read errors pass through so callers can surface them.
pub fn filter_games<'a, F: Read + Write + Seek>(
    store: &'a mut GameStore<F>,
    filter: &'a GameFilter,
) -> impl Iterator<Item = Result<(u32, GameEntry), StoreError>> + 'a {
    store.scan().filter(move |item| match item {
        Ok((_, entry)) => filter.matches(entry),
        Err(_) => true,
    })
}
