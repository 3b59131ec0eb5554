//! Flat-file persistence layer for the launcher catalog.
//!
//! Provides random-access stores over the fixed-width GAMES.DAT and
//! LBMAP.DAT record formats, plus the filter/query engine the launcher's
//! menus are built on. Stores are generic over their backing `Read + Write +
//! Seek`, so the same code runs against a file or an in-memory buffer.

pub mod mapstore;
pub mod queries;
pub mod store;

pub use mapstore::{MapScan, MapStore};
pub use queries::{GameFilter, filter_games};
pub use store::{GameStore, Scan, StoreError};
