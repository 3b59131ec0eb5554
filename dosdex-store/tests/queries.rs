use dosdex_catalog::types::{FmSound, GameEntry, Graphics, LegacySound, MidiSound};
use dosdex_store::{GameFilter, GameStore, filter_games};

fn entry(title: &str) -> GameEntry {
    GameEntry {
        title: title.to_string(),
        ..GameEntry::default()
    }
}

#[test]
fn empty_filter_matches_live_entries_only() {
    let filter = GameFilter::default();
    assert!(filter.matches(&entry("Anything")));

    let mut dead = entry("Gone");
    dead.deleted = true;
    assert!(!filter.matches(&dead));

    let include = GameFilter {
        include_deleted: true,
        ..GameFilter::default()
    };
    assert!(include.matches(&dead));
}

#[test]
fn title_substring_is_case_insensitive() {
    let filter = GameFilter {
        title: Some("city".to_string()),
        ..GameFilter::default()
    };
    assert!(filter.matches(&entry("SimCity 2000")));
    assert!(filter.matches(&entry("CITY BLOCKS")));
    assert!(!filter.matches(&entry("SimTower")));
}

#[test]
fn additive_fm_mask_semantics() {
    let mut e = entry("Strike Commander");
    e.fm_flags = FmSound::SB16 | FmSound::AWE32;

    let matches_mask = |mask: FmSound| {
        GameFilter {
            fm: Some(mask),
            ..GameFilter::default()
        }
        .matches(&e)
    };

    // Any overlapping bit qualifies...
    assert!(matches_mask(FmSound::SB16));
    assert!(matches_mask(FmSound::AWE32));
    assert!(matches_mask(FmSound::SB16 | FmSound::GUS));
    // ...but no overlap means no match.
    assert!(!matches_mask(FmSound::GUS));
}

#[test]
fn each_mask_dimension_is_independent() {
    let mut e = entry("Tie Fighter");
    e.sound_flags = LegacySound::DIGITIZED;
    e.midi_flags = MidiSound::GENERAL_MIDI;
    e.gfx_flags = Graphics::VGA;

    let filter = GameFilter {
        sound: Some(LegacySound::DIGITIZED | LegacySound::COVOX),
        midi: Some(MidiSound::GENERAL_MIDI),
        gfx: Some(Graphics::VGA),
        ..GameFilter::default()
    };
    assert!(filter.matches(&e));

    // One failing dimension sinks the whole predicate.
    let filter = GameFilter {
        sound: Some(LegacySound::PC_SPEAKER),
        midi: Some(MidiSound::GENERAL_MIDI),
        ..GameFilter::default()
    };
    assert!(!filter.matches(&e));
}

#[test]
fn text_and_categorical_dimensions_combine_with_and() {
    let mut e = entry("SimCity 2000");
    e.publisher = "Maxis".to_string();
    e.year = "1993".to_string();
    e.genre_code = 26;

    let matching = GameFilter {
        title: Some("sim".to_string()),
        publisher: Some("maxis".to_string()),
        year: Some("1993".to_string()),
        genre: Some(26),
        ..GameFilter::default()
    };
    assert!(matching.matches(&e));

    let wrong_year = GameFilter {
        year: Some("1994".to_string()),
        ..matching.clone()
    };
    assert!(!wrong_year.matches(&e));

    let wrong_genre = GameFilter {
        genre: Some(1),
        ..matching
    };
    assert!(!wrong_genre.matches(&e));
}

#[test]
fn removable_media_constraint() {
    let mut cd = entry("Rebel Assault");
    cd.requires_cd = true;

    let filter = GameFilter {
        no_removable_media: true,
        ..GameFilter::default()
    };
    assert!(!filter.matches(&cd));
    assert!(filter.matches(&entry("Floppy Only")));
}

#[test]
fn filter_games_walks_the_store_lazily() {
    let mut store = GameStore::in_memory();
    let mut a = entry("SimCity 2000");
    a.fm_flags = FmSound::SB16;
    let mut b = entry("SimCity Classic");
    b.fm_flags = FmSound::ADLIB;
    let mut c = entry("SimCity 3000");
    c.fm_flags = FmSound::SB16;
    store.append(&a).unwrap();
    store.append(&b).unwrap();
    store.append(&c).unwrap();
    store.soft_delete(3).unwrap();

    let filter = GameFilter {
        title: Some("simcity".to_string()),
        fm: Some(FmSound::SB16),
        ..GameFilter::default()
    };
    let hits: Vec<u32> = filter_games(&mut store, &filter)
        .map(|r| r.unwrap().0)
        .collect();
    // Position 3 matches the mask but is tombstoned.
    assert_eq!(hits, vec![1]);
}
