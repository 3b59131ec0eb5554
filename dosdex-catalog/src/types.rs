//! Data model types for the launcher catalog.
//!
//! These types mirror the launcher's on-disk records: one `GameEntry` per
//! GAMES.DAT slot, one `MapEntry` per LBMAP.DAT slot. The four capability
//! bytes are modeled as bit sets; bits outside the named constants are
//! reserved and round-trip through the codec untouched.

use bitflags::bitflags;

// ── Capability bit sets ─────────────────────────────────────────────────────

bitflags! {
    /// Legacy/digital sound hardware a title supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LegacySound: u8 {
        const PC_SPEAKER = 0x01;
        const TANDY = 0x02;
        const DIGITIZED = 0x04;
        const COVOX = 0x08;
        const DISNEY = 0x10;
    }
}

bitflags! {
    /// FM synthesis sound cards a title supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FmSound: u8 {
        const ADLIB = 0x01;
        const CMS = 0x02;
        const SB = 0x04;
        const SB_PRO = 0x08;
        const SB16 = 0x10;
        const AWE32 = 0x20;
        const GUS = 0x40;
    }
}

bitflags! {
    /// MIDI output hardware a title supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MidiSound: u8 {
        const MPU401 = 0x01;
        const GENERAL_MIDI = 0x02;
        const MT32 = 0x04;
        const SC55 = 0x08;
    }
}

bitflags! {
    /// Display adapters a title supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Graphics: u8 {
        const HERCULES = 0x01;
        const CGA = 0x02;
        const EGA = 0x04;
        const TANDY = 0x08;
        const VGA = 0x10;
        const SVGA = 0x20;
    }
}

/// Normalize a flag name for lookup: lowercase, spaces and hyphens stripped.
fn flag_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! named_flags {
    ($ty:ident, $(($flag:ident, $name:literal)),+ $(,)?) => {
        impl $ty {
            /// Named bits with their display names, in bit order.
            pub const NAMED: &'static [(Self, &'static str)] = &[
                $((Self::$flag, $name),)+
            ];

            /// Look up a single named bit, ignoring case, spaces, and hyphens.
            pub fn from_display_name(name: &str) -> Option<Self> {
                let key = flag_key(name);
                Self::NAMED
                    .iter()
                    .find(|(_, n)| flag_key(n) == key)
                    .map(|(flag, _)| *flag)
            }

            /// Display names of the named bits set in `self`.
            pub fn names(self) -> Vec<&'static str> {
                Self::NAMED
                    .iter()
                    .filter(|(flag, _)| self.intersects(*flag))
                    .map(|(_, n)| *n)
                    .collect()
            }
        }
    };
}

named_flags!(
    LegacySound,
    (PC_SPEAKER, "PC Speaker"),
    (TANDY, "Tandy"),
    (DIGITIZED, "Digitized"),
    (COVOX, "Covox"),
    (DISNEY, "Disney SS"),
);

named_flags!(
    FmSound,
    (ADLIB, "AdLib"),
    (CMS, "CMS"),
    (SB, "SB"),
    (SB_PRO, "SB Pro"),
    (SB16, "SB16"),
    (AWE32, "AWE32"),
    (GUS, "GUS"),
);

named_flags!(
    MidiSound,
    (MPU401, "MPU-401"),
    (GENERAL_MIDI, "General MIDI"),
    (MT32, "MT-32"),
    (SC55, "SC-55"),
);

named_flags!(
    Graphics,
    (HERCULES, "Hercules"),
    (CGA, "CGA"),
    (EGA, "EGA"),
    (TANDY, "Tandy"),
    (VGA, "VGA"),
    (SVGA, "SVGA"),
);

// ── Catalog entry ───────────────────────────────────────────────────────────

/// One cataloged title: a single GAMES.DAT slot.
///
/// Positions are 1-based and stable for the life of the file — deletion only
/// sets `deleted`, so a slot is never removed or reordered once appended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameEntry {
    pub title: String,
    pub path: String,
    pub command: String,
    pub args: String,
    pub sound_flags: LegacySound,
    pub fm_flags: FmSound,
    pub midi_flags: MidiSound,
    pub gfx_flags: Graphics,
    pub publisher: String,
    /// Release year as text; blank or a range when unknown.
    pub year: String,
    /// Index into [`crate::genre::GENRE_NAMES`]; 0 = none.
    pub genre_code: u8,
    /// Opaque timing value consumed by the launcher's slowdown shim.
    pub slowdown: u16,
    pub requires_cd: bool,
    /// Tombstone; the slot stays physically present.
    pub deleted: bool,
}

// ── Identity mapping entry ──────────────────────────────────────────────────

/// One LBMAP.DAT slot: binds a catalog position to a LaunchBox identity.
///
/// A record with `position == 0` is an unused slot. Corrections are appended
/// rather than rewritten, so lookups take the last matching record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapEntry {
    /// 1-based GAMES.DAT position; 0 = unused slot.
    pub position: u32,
    /// LaunchBox DatabaseID; 0 or negative when unknown.
    pub external_id: i32,
    /// LaunchBox GUID, empty when unknown.
    pub guid: String,
}
