//! Fixed-width binary codec for GAMES.DAT and LBMAP.DAT records.
//!
//! The layouts are a published contract — the launcher itself and external
//! tools read these files directly, so widths and offsets never change.
//!
//! Text fields are Pascal `String[N]`: one length byte, then up to N content
//! bytes, NUL-padded to N+1 bytes total. Over-long input is truncated, never
//! an error. The codec is byte-oriented ASCII; characters outside ASCII are
//! stored as `?`.
//!
//! # Game record (256 bytes)
//!
//! ```text
//! offset  width  field
//!      0     51  title        String[50]
//!     51     81  path         String[80]
//!    132     14  command      String[13]
//!    146     61  args         String[60]
//!    207      1  sound_flags  bit set
//!    208      1  fm_flags     bit set
//!    209      1  midi_flags   bit set
//!    210      1  gfx_flags    bit set
//!    211     31  publisher    String[30]
//!    242      5  year         String[4]
//!    247      1  genre_code   u8
//!    248      2  slowdown     u16 LE
//!    250      1  requires_cd  0/1
//!    251      1  deleted      0/1
//!    252      4  reserved     zero
//! ```
//!
//! # Mapping record (48 bytes)
//!
//! ```text
//! offset  width  field
//!      0      2  position     u16 LE, 1-based; 0 = unused slot
//!      2      4  external_id  i32 LE
//!      6     37  guid         String[36]
//!     43      5  reserved     zero
//! ```

use thiserror::Error;

use crate::genre::validate_genre_code;
use crate::types::{FmSound, GameEntry, Graphics, LegacySound, MapEntry, MidiSound};

/// Total width of one GAMES.DAT record.
pub const GAME_RECORD_LEN: usize = 256;
/// Total width of one LBMAP.DAT record.
pub const MAP_RECORD_LEN: usize = 48;

/// Maximum content length of each text field.
pub const TITLE_MAX: usize = 50;
pub const PATH_MAX: usize = 80;
pub const COMMAND_MAX: usize = 13;
pub const ARGS_MAX: usize = 60;
pub const PUBLISHER_MAX: usize = 30;
pub const YEAR_MAX: usize = 4;
pub const GUID_MAX: usize = 36;

const TITLE_OFF: usize = 0;
const PATH_OFF: usize = TITLE_OFF + TITLE_MAX + 1;
const COMMAND_OFF: usize = PATH_OFF + PATH_MAX + 1;
const ARGS_OFF: usize = COMMAND_OFF + COMMAND_MAX + 1;
const SOUND_OFF: usize = ARGS_OFF + ARGS_MAX + 1;
const FM_OFF: usize = SOUND_OFF + 1;
const MIDI_OFF: usize = FM_OFF + 1;
const GFX_OFF: usize = MIDI_OFF + 1;
const PUBLISHER_OFF: usize = GFX_OFF + 1;
const YEAR_OFF: usize = PUBLISHER_OFF + PUBLISHER_MAX + 1;
const GENRE_OFF: usize = YEAR_OFF + YEAR_MAX + 1;
const SLOWDOWN_OFF: usize = GENRE_OFF + 1;
const CD_OFF: usize = SLOWDOWN_OFF + 2;
const DELETED_OFF: usize = CD_OFF + 1;

const MAP_POSITION_OFF: usize = 0;
const MAP_ID_OFF: usize = 2;
const MAP_GUID_OFF: usize = 6;

/// Errors from encoding or decoding fixed-width records.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("record must be exactly {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("catalog position {0} does not fit in a mapping record")]
    PositionOverflow(u32),
}

// ── Pascal string helpers ───────────────────────────────────────────────────

/// Write `text` into a `String[N]` field (`field.len() == N + 1`).
///
/// Truncates to N bytes; non-ASCII characters become `?`. The field must be
/// pre-zeroed so unused bytes stay NUL.
fn put_pascal(field: &mut [u8], text: &str) {
    let max = field.len() - 1;
    let mut len = 0;
    for ch in text.chars().take(max) {
        field[1 + len] = if ch.is_ascii() { ch as u8 } else { b'?' };
        len += 1;
    }
    field[0] = len as u8;
}

/// Read a `String[N]` field back out, clamping a corrupt length byte to N.
fn get_pascal(field: &[u8]) -> String {
    let max = field.len() - 1;
    let len = (field[0] as usize).min(max);
    field[1..=len]
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

// ── Game records ────────────────────────────────────────────────────────────

/// Encode a catalog entry into one fixed-width game record.
pub fn encode_game(entry: &GameEntry) -> [u8; GAME_RECORD_LEN] {
    let mut rec = [0u8; GAME_RECORD_LEN];

    put_pascal(&mut rec[TITLE_OFF..PATH_OFF], &entry.title);
    put_pascal(&mut rec[PATH_OFF..COMMAND_OFF], &entry.path);
    put_pascal(&mut rec[COMMAND_OFF..ARGS_OFF], &entry.command);
    put_pascal(&mut rec[ARGS_OFF..SOUND_OFF], &entry.args);
    rec[SOUND_OFF] = entry.sound_flags.bits();
    rec[FM_OFF] = entry.fm_flags.bits();
    rec[MIDI_OFF] = entry.midi_flags.bits();
    rec[GFX_OFF] = entry.gfx_flags.bits();
    put_pascal(&mut rec[PUBLISHER_OFF..YEAR_OFF], &entry.publisher);
    put_pascal(&mut rec[YEAR_OFF..GENRE_OFF], &entry.year);
    rec[GENRE_OFF] = entry.genre_code;
    rec[SLOWDOWN_OFF..SLOWDOWN_OFF + 2].copy_from_slice(&entry.slowdown.to_le_bytes());
    rec[CD_OFF] = entry.requires_cd as u8;
    rec[DELETED_OFF] = entry.deleted as u8;

    rec
}

/// Decode one fixed-width game record.
///
/// Fails fast if `data` is not exactly [`GAME_RECORD_LEN`] bytes. Flag bytes
/// are taken verbatim so reserved bits survive a round trip; genre codes
/// outside the known table decode as 0 with a logged warning.
pub fn decode_game(data: &[u8]) -> Result<GameEntry, CodecError> {
    if data.len() != GAME_RECORD_LEN {
        return Err(CodecError::WrongLength {
            expected: GAME_RECORD_LEN,
            actual: data.len(),
        });
    }

    Ok(GameEntry {
        title: get_pascal(&data[TITLE_OFF..PATH_OFF]),
        path: get_pascal(&data[PATH_OFF..COMMAND_OFF]),
        command: get_pascal(&data[COMMAND_OFF..ARGS_OFF]),
        args: get_pascal(&data[ARGS_OFF..SOUND_OFF]),
        sound_flags: LegacySound::from_bits_retain(data[SOUND_OFF]),
        fm_flags: FmSound::from_bits_retain(data[FM_OFF]),
        midi_flags: MidiSound::from_bits_retain(data[MIDI_OFF]),
        gfx_flags: Graphics::from_bits_retain(data[GFX_OFF]),
        publisher: get_pascal(&data[PUBLISHER_OFF..YEAR_OFF]),
        year: get_pascal(&data[YEAR_OFF..GENRE_OFF]),
        genre_code: validate_genre_code(data[GENRE_OFF]),
        slowdown: u16::from_le_bytes([data[SLOWDOWN_OFF], data[SLOWDOWN_OFF + 1]]),
        requires_cd: data[CD_OFF] != 0,
        deleted: data[DELETED_OFF] != 0,
    })
}

// ── Mapping records ─────────────────────────────────────────────────────────

/// Encode an identity mapping into one fixed-width mapping record.
///
/// Positions are stored as u16 on disk; a position past `u16::MAX` is a
/// caller bug and fails rather than truncating.
pub fn encode_mapping(entry: &MapEntry) -> Result<[u8; MAP_RECORD_LEN], CodecError> {
    let position = u16::try_from(entry.position)
        .map_err(|_| CodecError::PositionOverflow(entry.position))?;

    let mut rec = [0u8; MAP_RECORD_LEN];
    rec[MAP_POSITION_OFF..MAP_POSITION_OFF + 2].copy_from_slice(&position.to_le_bytes());
    rec[MAP_ID_OFF..MAP_ID_OFF + 4].copy_from_slice(&entry.external_id.to_le_bytes());
    put_pascal(&mut rec[MAP_GUID_OFF..MAP_GUID_OFF + GUID_MAX + 1], &entry.guid);

    Ok(rec)
}

/// Decode one fixed-width mapping record.
pub fn decode_mapping(data: &[u8]) -> Result<MapEntry, CodecError> {
    if data.len() != MAP_RECORD_LEN {
        return Err(CodecError::WrongLength {
            expected: MAP_RECORD_LEN,
            actual: data.len(),
        });
    }

    Ok(MapEntry {
        position: u16::from_le_bytes([data[MAP_POSITION_OFF], data[MAP_POSITION_OFF + 1]]) as u32,
        external_id: i32::from_le_bytes([
            data[MAP_ID_OFF],
            data[MAP_ID_OFF + 1],
            data[MAP_ID_OFF + 2],
            data[MAP_ID_OFF + 3],
        ]),
        guid: get_pascal(&data[MAP_GUID_OFF..MAP_GUID_OFF + GUID_MAX + 1]),
    })
}
