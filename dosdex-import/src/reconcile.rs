//! Batch reconciliation of external metadata against the catalog.
//!
//! For each external record, in input order:
//!
//! 1. an LBMAP.DAT mapping (by DatabaseID, then GUID) pointing at a live
//!    entry wins outright — the entry is updated in place;
//! 2. otherwise the best fuzzy title match above the threshold is updated
//!    and promoted to an exact mapping, unless a runner-up scores close
//!    enough to make the choice ambiguous;
//! 3. otherwise a new entry is appended, with its mapping.
//!
//! Ambiguous fuzzy cases update nothing: the record is appended as new and
//! the collision is reported for manual review. A wrong update would
//! silently corrupt an existing entry; a duplicate append is visible and
//! fixable in the launcher's editor.
//!
//! Both stores are flushed after every record, so a crash mid-batch leaves
//! the files mutually consistent and a retry resolves the committed prefix
//! via the mappings written in this run.

use std::io::{Read, Seek, Write};

use dosdex_catalog::genre::genre_name_to_code;
use dosdex_catalog::titles::{
    DEFAULT_AMBIGUITY_MARGIN, DEFAULT_MATCH_THRESHOLD, title_similarity,
};
use dosdex_catalog::types::{FmSound, GameEntry, Graphics, LegacySound, MapEntry, MidiSound};
use dosdex_store::mapstore::MapStore;
use dosdex_store::store::{GameStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// One normalized external metadata record.
///
/// Translating a source's native format into this shape is the caller's
/// job (see [`crate::launchbox`] for LaunchBox XML). Capability hints
/// default to empty when the source has none.
#[derive(Debug, Clone, Default)]
pub struct ExternalGame {
    /// LaunchBox DatabaseID; 0 when the source has none.
    pub external_id: i32,
    /// LaunchBox GUID; empty when the source has none.
    pub guid: String,
    pub title: String,
    pub publisher: String,
    pub year: String,
    /// Genre name, mapped through the launcher's genre table.
    pub genre: String,
    pub sound: LegacySound,
    pub fm: FmSound,
    pub midi: MidiSound,
    pub gfx: Graphics,
}

/// Options controlling a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Minimum title similarity for a fuzzy match.
    pub match_threshold: f64,
    /// A runner-up within this margin of the best score is ambiguous.
    pub ambiguity_margin: f64,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            ambiguity_margin: DEFAULT_AMBIGUITY_MARGIN,
        }
    }
}

/// How one external record was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Resolved through an existing identity mapping.
    MatchedExact,
    /// Resolved by title similarity; a mapping was appended.
    MatchedFuzzy,
    /// No match; a new catalog entry was appended.
    Created,
}

/// Per-outcome tallies for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub matched_exact: u32,
    pub matched_fuzzy: u32,
    pub created: u32,
}

/// How one external record landed, for display.
#[derive(Debug, Clone)]
pub struct ReconcileDetail {
    pub external_title: String,
    pub outcome: ReconcileOutcome,
    /// Catalog position the record landed at.
    pub position: u32,
    /// Title of the catalog entry it landed at.
    pub catalog_title: String,
    /// Similarity score, for fuzzy matches.
    pub score: Option<f64>,
}

/// A fuzzy case that was too close to call.
#[derive(Debug, Clone)]
pub struct AmbiguousMatch {
    pub external_title: String,
    pub best_position: u32,
    pub best_title: String,
    pub best_score: f64,
    pub runner_up_position: u32,
    pub runner_up_title: String,
    pub runner_up_score: f64,
}

/// Result of a reconciliation run.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub stats: ReconcileStats,
    pub details: Vec<ReconcileDetail>,
    /// Fuzzy candidates skipped as ambiguous, for manual review.
    pub ambiguous: Vec<AmbiguousMatch>,
}

/// Merge an external batch into the catalog.
///
/// Every record yields exactly one outcome; the first storage fault aborts
/// the batch with all prior records committed.
pub fn reconcile<F, G>(
    games: &mut GameStore<F>,
    mappings: &mut MapStore<G>,
    batch: &[ExternalGame],
    options: &ReconcileOptions,
) -> Result<ReconcileReport, ReconcileError>
where
    F: Read + Write + Seek,
    G: Read + Write + Seek,
{
    let mut report = ReconcileReport::default();
    log::info!(
        "reconciling {} external records against {} catalog entries",
        batch.len(),
        games.record_count()
    );

    for external in batch {
        reconcile_one(games, mappings, external, options, &mut report)?;
        // One unit of work per record: both stores on disk before the next.
        games.flush()?;
        mappings.flush()?;
    }

    log::info!(
        "reconcile done: {} exact, {} fuzzy, {} created, {} ambiguous",
        report.stats.matched_exact,
        report.stats.matched_fuzzy,
        report.stats.created,
        report.ambiguous.len()
    );
    Ok(report)
}

fn reconcile_one<F, G>(
    games: &mut GameStore<F>,
    mappings: &mut MapStore<G>,
    external: &ExternalGame,
    options: &ReconcileOptions,
    report: &mut ReconcileReport,
) -> Result<(), ReconcileError>
where
    F: Read + Write + Seek,
    G: Read + Write + Seek,
{
    // 1. Exact: a stored identity mapping pointing at a live entry.
    if let Some(position) = find_mapped_position(games, mappings, external)? {
        let mut entry = games.read_at(position)?;
        merge_external(&mut entry, external);
        games.update_at(position, &entry)?;
        report.stats.matched_exact += 1;
        report.details.push(ReconcileDetail {
            external_title: external.title.clone(),
            outcome: ReconcileOutcome::MatchedExact,
            position,
            catalog_title: entry.title,
            score: None,
        });
        return Ok(());
    }

    // 2. Fuzzy: best unambiguous title match, promoted to a mapping.
    match best_fuzzy_candidate(games, &external.title, options)? {
        Fuzzy::Match { position, score } => {
            let mut entry = games.read_at(position)?;
            merge_external(&mut entry, external);
            games.update_at(position, &entry)?;
            mappings.append(&MapEntry {
                position,
                external_id: external.external_id,
                guid: external.guid.clone(),
            })?;
            report.stats.matched_fuzzy += 1;
            report.details.push(ReconcileDetail {
                external_title: external.title.clone(),
                outcome: ReconcileOutcome::MatchedFuzzy,
                position,
                catalog_title: entry.title,
                score: Some(score),
            });
            return Ok(());
        }
        Fuzzy::Ambiguous(ambiguous) => {
            log::warn!(
                "ambiguous match for '{}': '{}' ({:.2}) vs '{}' ({:.2}); creating new entry",
                ambiguous.external_title,
                ambiguous.best_title,
                ambiguous.best_score,
                ambiguous.runner_up_title,
                ambiguous.runner_up_score
            );
            report.ambiguous.push(ambiguous);
        }
        Fuzzy::None => {}
    }

    // 3. Create.
    let entry = new_entry(external);
    let position = games.append(&entry)?;
    mappings.append(&MapEntry {
        position,
        external_id: external.external_id,
        guid: external.guid.clone(),
    })?;
    report.stats.created += 1;
    report.details.push(ReconcileDetail {
        external_title: external.title.clone(),
        outcome: ReconcileOutcome::Created,
        position,
        catalog_title: entry.title,
        score: None,
    });
    Ok(())
}

/// Resolve an external record through LBMAP.DAT, by DatabaseID then GUID.
///
/// Stale mappings — unused slots, positions past the end of the catalog, or
/// tombstoned targets — are ignored so the record falls through to fuzzy
/// matching.
fn find_mapped_position<F, G>(
    games: &mut GameStore<F>,
    mappings: &mut MapStore<G>,
    external: &ExternalGame,
) -> Result<Option<u32>, ReconcileError>
where
    F: Read + Write + Seek,
    G: Read + Write + Seek,
{
    let mapping = match mappings.find_by_external_id(external.external_id)? {
        Some(mapping) => Some(mapping),
        None => mappings.find_by_guid(&external.guid)?,
    };
    let Some(mapping) = mapping else {
        return Ok(None);
    };

    if mapping.position == 0 || mapping.position > games.record_count() {
        log::warn!(
            "mapping for id {} points at missing position {}",
            mapping.external_id,
            mapping.position
        );
        return Ok(None);
    }
    let entry = games.read_at(mapping.position)?;
    if entry.deleted {
        return Ok(None);
    }
    Ok(Some(mapping.position))
}

enum Fuzzy {
    Match { position: u32, score: f64 },
    Ambiguous(AmbiguousMatch),
    None,
}

/// Score every live entry against `title` and keep the two best.
fn best_fuzzy_candidate<F: Read + Write + Seek>(
    games: &mut GameStore<F>,
    title: &str,
    options: &ReconcileOptions,
) -> Result<Fuzzy, ReconcileError> {
    let mut best: Option<(u32, String, f64)> = None;
    let mut runner_up: Option<(u32, String, f64)> = None;

    for item in games.scan() {
        let (position, entry) = item?;
        if entry.deleted {
            continue;
        }
        let score = title_similarity(title, &entry.title);
        if best.as_ref().is_none_or(|(_, _, b)| score > *b) {
            runner_up = best.take();
            best = Some((position, entry.title, score));
        } else if runner_up.as_ref().is_none_or(|(_, _, r)| score > *r) {
            runner_up = Some((position, entry.title, score));
        }
    }

    let Some((position, best_title, best_score)) = best else {
        return Ok(Fuzzy::None);
    };
    if best_score < options.match_threshold {
        return Ok(Fuzzy::None);
    }

    if let Some((rp, rt, rs)) = runner_up {
        if rs >= options.match_threshold && best_score - rs < options.ambiguity_margin {
            return Ok(Fuzzy::Ambiguous(AmbiguousMatch {
                external_title: title.to_string(),
                best_position: position,
                best_title,
                best_score,
                runner_up_position: rp,
                runner_up_title: rt,
                runner_up_score: rs,
            }));
        }
    }

    Ok(Fuzzy::Match {
        position,
        score: best_score,
    })
}

/// Merge external metadata into a catalog entry.
///
/// Publisher, year, and genre fill only when blank — an import never
/// overwrites what a user typed in the editor. Capability hints are OR-ed
/// in. Invocation fields, the slowdown value, and the CD flag belong to the
/// editor and are never touched.
fn merge_external(entry: &mut GameEntry, external: &ExternalGame) {
    if entry.publisher.trim().is_empty() && !external.publisher.is_empty() {
        entry.publisher = external.publisher.clone();
    }
    if entry.year.trim().is_empty() && !external.year.is_empty() {
        entry.year = external.year.clone();
    }
    if entry.genre_code == 0 {
        entry.genre_code = genre_name_to_code(&external.genre);
    }
    entry.sound_flags |= external.sound;
    entry.fm_flags |= external.fm;
    entry.midi_flags |= external.midi;
    entry.gfx_flags |= external.gfx;
}

/// Build a fresh catalog entry from an external record. Invocation fields
/// start blank; the user wires those up in the editor.
fn new_entry(external: &ExternalGame) -> GameEntry {
    let mut entry = GameEntry {
        title: external.title.clone(),
        ..GameEntry::default()
    };
    merge_external(&mut entry, external);
    entry
}
