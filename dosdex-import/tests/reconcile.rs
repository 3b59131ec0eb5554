use dosdex_catalog::types::{FmSound, GameEntry, LegacySound};
use dosdex_import::{ExternalGame, ReconcileOptions, ReconcileOutcome, reconcile};
use dosdex_store::{GameStore, MapStore};

fn external(id: i32, title: &str) -> ExternalGame {
    ExternalGame {
        external_id: id,
        guid: format!("guid-{id}"),
        title: title.to_string(),
        ..ExternalGame::default()
    }
}

fn catalog_entry(title: &str) -> GameEntry {
    GameEntry {
        title: title.to_string(),
        ..GameEntry::default()
    }
}

fn snapshot(store: &mut GameStore<std::io::Cursor<Vec<u8>>>) -> Vec<GameEntry> {
    store.scan().map(|r| r.unwrap().1).collect()
}

#[test]
fn new_title_is_created_with_its_mapping() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();

    let mut batch_entry = external(1, "SIMCITY 2000");
    batch_entry.fm = FmSound::SB16;
    batch_entry.genre = "Education".to_string();
    batch_entry.year = "1993".to_string();

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    assert_eq!(report.stats.created, 1);
    assert_eq!(report.stats.matched_exact, 0);
    assert_eq!(report.details[0].outcome, ReconcileOutcome::Created);

    let created = games.read_at(1).unwrap();
    assert_eq!(created.title, "SIMCITY 2000");
    assert!(created.fm_flags.contains(FmSound::SB16));
    assert_eq!(created.genre_code, 8);
    assert_eq!(created.year, "1993");

    let mapping = mappings.find_by_external_id(1).unwrap().unwrap();
    assert_eq!(mapping.position, 1);
}

#[test]
fn rerunning_the_same_batch_is_idempotent() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();

    let batch = vec![
        {
            let mut e = external(1, "SIMCITY 2000");
            e.fm = FmSound::SB16;
            e.year = "1993".to_string();
            e
        },
        {
            let mut e = external(2, "WOLFENSTEIN 3D");
            e.sound = LegacySound::DIGITIZED;
            e.genre = "Shooter".to_string();
            e
        },
    ];
    let options = ReconcileOptions::default();

    let first = reconcile(&mut games, &mut mappings, &batch, &options).unwrap();
    assert_eq!(first.stats.created, 2);
    let after_first = snapshot(&mut games);
    let mappings_after_first = mappings.record_count();

    let second = reconcile(&mut games, &mut mappings, &batch, &options).unwrap();
    assert_eq!(second.stats.created, 0);
    assert_eq!(second.stats.matched_exact, 2);
    assert_eq!(snapshot(&mut games), after_first);
    // Exact matches never append new mappings.
    assert_eq!(mappings.record_count(), mappings_after_first);
}

#[test]
fn fuzzy_match_updates_and_promotes_to_exact() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    games.append(&catalog_entry("SIMCITY 2000")).unwrap();

    let mut batch_entry = external(1, "SimCity 2000");
    batch_entry.year = "1993".to_string();

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    assert_eq!(report.stats.matched_fuzzy, 1);
    assert_eq!(report.stats.created, 0);
    assert_eq!(games.record_count(), 1);
    // The catalog keeps its own title; only missing metadata is filled.
    let updated = games.read_at(1).unwrap();
    assert_eq!(updated.title, "SIMCITY 2000");
    assert_eq!(updated.year, "1993");

    let mapping = mappings.find_by_external_id(1).unwrap().unwrap();
    assert_eq!(mapping.position, 1);
    assert_eq!(mapping.guid, "guid-1");
}

#[test]
fn existing_mapping_beats_a_better_fuzzy_candidate() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    games.append(&catalog_entry("ALPHA ONE")).unwrap();
    // Position 2 would win on pure similarity (identical string).
    games.append(&catalog_entry("Alpha One")).unwrap();
    mappings
        .append(&dosdex_catalog::types::MapEntry {
            position: 1,
            external_id: 7,
            guid: String::new(),
        })
        .unwrap();

    let mut batch_entry = external(7, "Alpha One");
    batch_entry.year = "1990".to_string();

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    assert_eq!(report.stats.matched_exact, 1);
    assert_eq!(report.details[0].position, 1);
    assert_eq!(games.read_at(1).unwrap().year, "1990");
    assert_eq!(games.read_at(2).unwrap().year, "");
}

#[test]
fn guid_mapping_matches_when_id_is_missing() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    games.append(&catalog_entry("DUNE II")).unwrap();
    mappings
        .append(&dosdex_catalog::types::MapEntry {
            position: 1,
            external_id: 0,
            guid: "abc-def".to_string(),
        })
        .unwrap();

    let batch_entry = ExternalGame {
        external_id: 0,
        guid: "abc-def".to_string(),
        // Deliberately unlike the stored title, so fuzzy couldn't find it.
        title: "Dune 2: Battle for Arrakis".to_string(),
        year: "1992".to_string(),
        ..ExternalGame::default()
    };

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    assert_eq!(report.stats.matched_exact, 1);
    assert_eq!(games.read_at(1).unwrap().year, "1992");
}

#[test]
fn ambiguous_candidates_are_skipped_and_reported() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    // Two equally plausible homes for the incoming record.
    games.append(&catalog_entry("MEGA RACE")).unwrap();
    games.append(&catalog_entry("Mega Race")).unwrap();

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[external(9, "MegaRace")],
        &ReconcileOptions::default(),
    )
    .unwrap();

    // Neither candidate was guessed at; the record landed as a new entry.
    assert_eq!(report.stats.matched_fuzzy, 0);
    assert_eq!(report.stats.created, 1);
    assert_eq!(report.ambiguous.len(), 1);
    assert_eq!(games.record_count(), 3);
    assert_eq!(games.read_at(1).unwrap().year, "");
    assert_eq!(games.read_at(2).unwrap().year, "");

    let ambiguous = &report.ambiguous[0];
    assert_eq!(ambiguous.external_title, "MegaRace");
    assert!(ambiguous.best_score >= 0.8);
    assert!(ambiguous.runner_up_score >= 0.8);
}

#[test]
fn import_never_overwrites_user_entered_metadata() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    let mut existing = catalog_entry("XCOM UFO DEFENSE");
    existing.publisher = "MicroProse".to_string();
    existing.path = "C:\\GAMES\\XCOM".to_string();
    existing.command = "XCOM.EXE".to_string();
    games.append(&existing).unwrap();

    let batch_entry = ExternalGame {
        external_id: 4,
        title: "XCOM UFO DEFENSE".to_string(),
        publisher: "Someone Else".to_string(),
        year: "1994".to_string(),
        genre: "Strategy".to_string(),
        ..ExternalGame::default()
    };

    reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    let updated = games.read_at(1).unwrap();
    // Filled where blank, kept where present.
    assert_eq!(updated.publisher, "MicroProse");
    assert_eq!(updated.year, "1994");
    assert_eq!(updated.genre_code, 26);
    // Invocation fields are the editor's business, not the importer's.
    assert_eq!(updated.path, "C:\\GAMES\\XCOM");
    assert_eq!(updated.command, "XCOM.EXE");
}

#[test]
fn mapping_to_a_tombstoned_entry_falls_through() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    games.append(&catalog_entry("GONE GAME")).unwrap();
    mappings
        .append(&dosdex_catalog::types::MapEntry {
            position: 1,
            external_id: 3,
            guid: String::new(),
        })
        .unwrap();
    games.soft_delete(1).unwrap();

    let report = reconcile(
        &mut games,
        &mut mappings,
        &[external(3, "Gone Game")],
        &ReconcileOptions::default(),
    )
    .unwrap();

    // Tombstoned target: not updated, and fuzzy skips it too.
    assert_eq!(report.stats.matched_exact, 0);
    assert_eq!(report.stats.created, 1);
    assert_eq!(games.record_count(), 2);
    assert!(games.read_at(1).unwrap().deleted);
}

#[test]
fn capability_hints_accumulate_across_sources() {
    let mut games = GameStore::in_memory();
    let mut mappings = MapStore::in_memory();
    let mut existing = catalog_entry("STRIKE COMMANDER");
    existing.fm_flags = FmSound::ADLIB;
    games.append(&existing).unwrap();

    let mut batch_entry = external(5, "Strike Commander");
    batch_entry.fm = FmSound::SB16;

    reconcile(
        &mut games,
        &mut mappings,
        &[batch_entry],
        &ReconcileOptions::default(),
    )
    .unwrap();

    let updated = games.read_at(1).unwrap();
    assert!(updated.fm_flags.contains(FmSound::ADLIB));
    assert!(updated.fm_flags.contains(FmSound::SB16));
}
