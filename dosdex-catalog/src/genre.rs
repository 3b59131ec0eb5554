//! Genre code table and name mapping.
//!
//! The launcher stores genres as a single byte indexing a closed table of 28
//! named genres (0 = none). LaunchBox exports use free-form genre names, so
//! name-to-code matching falls back from exact to case-insensitive to a
//! keyword ladder for the common variations.

/// Genre display names, indexed by code. Code 0 is "(None)".
pub const GENRE_NAMES: [&str; 29] = [
    "(None)",
    "Action",
    "Adventure",
    "Beat 'em Up",
    "Board Game",
    "Casino",
    "Compilation",
    "Construction and Management Simulation",
    "Education",
    "Fighting",
    "Flight Simulator",
    "Horror",
    "Life Simulation",
    "MMO",
    "Music",
    "Party",
    "Pinball",
    "Platform",
    "Puzzle",
    "Quiz",
    "Racing",
    "Role-Playing",
    "Sandbox",
    "Shooter",
    "Sports",
    "Stealth",
    "Strategy",
    "Vehicle Simulation",
    "Visual Novel",
];

/// Display name for a genre code. Out-of-range codes read as "(None)".
pub fn genre_code_to_name(code: u8) -> &'static str {
    GENRE_NAMES.get(code as usize).copied().unwrap_or(GENRE_NAMES[0])
}

/// Clamp a decoded genre code into the known table.
///
/// Historical data may carry codes added after a record was written; those
/// read as 0 (none) with a logged warning rather than failing the decode.
pub fn validate_genre_code(code: u8) -> u8 {
    if (code as usize) < GENRE_NAMES.len() {
        code
    } else {
        log::warn!("unknown genre code {code}, treating as (None)");
        0
    }
}

/// Map a genre name to its code, with loose matching for common variations.
///
/// Tries an exact table match, then case-insensitive, then keywords.
/// Unknown names map to 0.
pub fn genre_name_to_code(name: &str) -> u8 {
    let name = name.trim();
    if name.is_empty() {
        return 0;
    }

    for (code, known) in GENRE_NAMES.iter().enumerate() {
        if name == *known || name.eq_ignore_ascii_case(known) {
            return code as u8;
        }
    }

    keyword_code(&name.to_uppercase())
}

/// Keyword ladder for genre names that don't match the table directly.
fn keyword_code(upper: &str) -> u8 {
    let has = |needle: &str| upper.contains(needle);

    if has("ACTION") {
        1
    } else if has("ADVENTURE") {
        2
    } else if has("BEAT") || has("BRAWL") {
        3
    } else if has("BOARD") {
        4
    } else if has("CASINO") {
        5
    } else if has("COMPILATION") {
        6
    } else if has("CONSTRUCTION") || has("MANAGEMENT") || has("BUILDING") {
        7
    } else if has("EDUCATION") || has("LEARNING") {
        8
    } else if has("FIGHTING") {
        9
    } else if has("FLIGHT") {
        10
    } else if has("HORROR") {
        11
    } else if has("LIFE") && has("SIM") {
        12
    } else if has("MMO") || has("ONLINE") {
        13
    } else if has("MUSIC") || has("RHYTHM") {
        14
    } else if has("PARTY") {
        15
    } else if has("PINBALL") {
        16
    } else if has("PLATFORM") {
        17
    } else if has("PUZZLE") {
        18
    } else if has("QUIZ") || has("TRIVIA") {
        19
    } else if has("RACING") || has("DRIVING") {
        20
    } else if has("ROLE") || has("RPG") {
        21
    } else if has("SANDBOX") {
        22
    } else if has("SHOOT") || has("FPS") || has("SHMUP") {
        23
    } else if has("SPORT") {
        24
    } else if has("STEALTH") {
        25
    } else if has("STRATEG") {
        26
    } else if has("VEHICLE") && has("SIM") {
        27
    } else if has("VISUAL") && has("NOVEL") {
        28
    } else {
        0
    }
}
