//! LaunchBox metadata import for the launcher catalog.
//!
//! This crate owns the import pipeline: parsing a LaunchBox XML export into
//! normalized external records, then reconciling that batch against
//! GAMES.DAT and LBMAP.DAT — exact-matching by stored identity first,
//! falling back to fuzzy title matching, creating entries only when neither
//! finds a home. Repeated imports of the same export are no-ops.

pub mod launchbox;
pub mod reconcile;

pub use launchbox::{LaunchBoxError, parse_launchbox, parse_launchbox_file};
pub use reconcile::{
    AmbiguousMatch, ExternalGame, ReconcileDetail, ReconcileError, ReconcileOptions,
    ReconcileOutcome, ReconcileReport, ReconcileStats, reconcile,
};
