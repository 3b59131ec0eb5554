//! Random-access store of fixed-width game records.
//!
//! GAMES.DAT is a bare sequence of 256-byte records addressed by 1-based
//! position. Fixed widths give O(1) access by position, and positions are
//! permanent identities: deletion is a tombstone bit, never a slot removal,
//! which is what keeps LBMAP.DAT's position references valid indefinitely.

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use dosdex_catalog::record::{CodecError, GAME_RECORD_LEN, decode_game, encode_game};
use dosdex_catalog::types::GameEntry;
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("position {position} out of range (store holds {count} records)")]
    OutOfRange { position: u32, count: u32 },

    #[error("record codec error: {0}")]
    Codec(#[from] CodecError),
}

/// A sequence of fixed-width game records over seekable storage.
pub struct GameStore<F> {
    file: F,
    count: u32,
}

impl GameStore<File> {
    /// Open a GAMES.DAT store at `path`, creating it if missing.
    ///
    /// A file size that is not a whole number of records logs a warning and
    /// the trailing bytes are ignored.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            count: whole_records(len, GAME_RECORD_LEN),
        })
    }
}

impl GameStore<Cursor<Vec<u8>>> {
    /// An empty in-memory store, for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// An in-memory store seeded with existing file contents.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let count = whole_records(data.len() as u64, GAME_RECORD_LEN);
        Self {
            file: Cursor::new(data),
            count,
        }
    }
}

/// Record count for a byte length, warning on a trailing partial record.
pub(crate) fn whole_records(len: u64, record_len: usize) -> u32 {
    if len % record_len as u64 != 0 {
        log::warn!("store size {len} is not a multiple of {record_len}; ignoring trailing bytes");
    }
    (len / record_len as u64) as u32
}

impl<F: Read + Write + Seek> GameStore<F> {
    /// Number of records, including tombstoned ones.
    pub fn record_count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn check(&self, position: u32) -> Result<(), StoreError> {
        if position == 0 || position > self.count {
            return Err(StoreError::OutOfRange {
                position,
                count: self.count,
            });
        }
        Ok(())
    }

    fn seek_to(&mut self, position: u32) -> Result<(), StoreError> {
        let offset = (position as u64 - 1) * GAME_RECORD_LEN as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Append a record, returning its 1-based position.
    pub fn append(&mut self, entry: &GameEntry) -> Result<u32, StoreError> {
        self.file
            .seek(SeekFrom::Start(self.count as u64 * GAME_RECORD_LEN as u64))?;
        self.file.write_all(&encode_game(entry))?;
        self.count += 1;
        Ok(self.count)
    }

    /// Read the record at a 1-based position.
    pub fn read_at(&mut self, position: u32) -> Result<GameEntry, StoreError> {
        self.check(position)?;
        self.seek_to(position)?;
        let mut buf = [0u8; GAME_RECORD_LEN];
        self.file.read_exact(&mut buf)?;
        Ok(decode_game(&buf)?)
    }

    /// Overwrite the record at a 1-based position.
    pub fn update_at(&mut self, position: u32, entry: &GameEntry) -> Result<(), StoreError> {
        self.check(position)?;
        self.seek_to(position)?;
        self.file.write_all(&encode_game(entry))?;
        Ok(())
    }

    /// Set the tombstone bit at `position`. Idempotent; the slot's other
    /// fields are left as they are.
    pub fn soft_delete(&mut self, position: u32) -> Result<(), StoreError> {
        let mut entry = self.read_at(position)?;
        if !entry.deleted {
            entry.deleted = true;
            self.update_at(position, &entry)?;
        }
        Ok(())
    }

    /// Flush buffered writes to the backing storage.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.file.flush()?;
        Ok(())
    }

    /// Iterate all records from position 1, tombstoned ones included.
    /// Each call starts a fresh pass.
    pub fn scan(&mut self) -> Scan<'_, F> {
        Scan {
            store: self,
            next: 1,
        }
    }
}

/// Iterator over `(position, entry)` pairs of a [`GameStore`].
pub struct Scan<'a, F> {
    store: &'a mut GameStore<F>,
    next: u32,
}

impl<F: Read + Write + Seek> Iterator for Scan<'_, F> {
    type Item = Result<(u32, GameEntry), StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.store.count {
            return None;
        }
        let position = self.next;
        self.next += 1;
        Some(self.store.read_at(position).map(|entry| (position, entry)))
    }
}
