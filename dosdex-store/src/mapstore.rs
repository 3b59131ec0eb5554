//! Store of LaunchBox identity mapping records.
//!
//! LBMAP.DAT associates catalog positions with LaunchBox identities so
//! repeated imports re-match exactly instead of fuzzily. The file is an
//! optional accelerator: the catalog is fully usable without it.
//!
//! There is no update or delete — a correction is appended, and lookups
//! return the last record matching a key.

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use dosdex_catalog::record::{MAP_RECORD_LEN, decode_mapping, encode_mapping};
use dosdex_catalog::types::MapEntry;

use crate::store::{StoreError, whole_records};

/// A sequence of fixed-width mapping records over seekable storage.
pub struct MapStore<F> {
    file: F,
    count: u32,
}

impl MapStore<File> {
    /// Open an LBMAP.DAT store at `path`, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file,
            count: whole_records(len, MAP_RECORD_LEN),
        })
    }
}

impl MapStore<Cursor<Vec<u8>>> {
    /// An empty in-memory store, for tests and dry runs.
    pub fn in_memory() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// An in-memory store seeded with existing file contents.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let count = whole_records(data.len() as u64, MAP_RECORD_LEN);
        Self {
            file: Cursor::new(data),
            count,
        }
    }
}

impl<F: Read + Write + Seek> MapStore<F> {
    pub fn record_count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append a mapping record, returning its 1-based position.
    pub fn append(&mut self, entry: &MapEntry) -> Result<u32, StoreError> {
        let rec = encode_mapping(entry)?;
        self.file
            .seek(SeekFrom::Start(self.count as u64 * MAP_RECORD_LEN as u64))?;
        self.file.write_all(&rec)?;
        self.count += 1;
        Ok(self.count)
    }

    /// Flush buffered writes to the backing storage.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.file.flush()?;
        Ok(())
    }

    /// Iterate all mapping records in file order, unused slots included.
    pub fn scan(&mut self) -> MapScan<'_, F> {
        MapScan {
            store: self,
            next: 1,
        }
    }

    /// Last live mapping with this LaunchBox DatabaseID, if any.
    /// Ids of zero or below never match.
    pub fn find_by_external_id(&mut self, external_id: i32) -> Result<Option<MapEntry>, StoreError> {
        if external_id <= 0 {
            return Ok(None);
        }
        self.find_last(|entry| entry.external_id == external_id)
    }

    /// Last live mapping with this LaunchBox GUID, if any.
    pub fn find_by_guid(&mut self, guid: &str) -> Result<Option<MapEntry>, StoreError> {
        if guid.is_empty() {
            return Ok(None);
        }
        self.find_last(|entry| entry.guid == guid)
    }

    /// Last live mapping for this catalog position, if any.
    pub fn find_by_position(&mut self, position: u32) -> Result<Option<MapEntry>, StoreError> {
        if position == 0 {
            return Ok(None);
        }
        self.find_last(|entry| entry.position == position)
    }

    /// Linear scan keeping the last match; unused slots (position 0) never
    /// match.
    fn find_last(
        &mut self,
        mut pred: impl FnMut(&MapEntry) -> bool,
    ) -> Result<Option<MapEntry>, StoreError> {
        let mut found = None;
        for item in self.scan() {
            let (_, entry) = item?;
            if entry.position != 0 && pred(&entry) {
                found = Some(entry);
            }
        }
        Ok(found)
    }

    fn read_at(&mut self, position: u32) -> Result<MapEntry, StoreError> {
        if position == 0 || position > self.count {
            return Err(StoreError::OutOfRange {
                position,
                count: self.count,
            });
        }
        let offset = (position as u64 - 1) * MAP_RECORD_LEN as u64;
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = [0u8; MAP_RECORD_LEN];
        self.file.read_exact(&mut buf)?;
        Ok(decode_mapping(&buf)?)
    }
}

/// Iterator over `(position, entry)` pairs of a [`MapStore`].
pub struct MapScan<'a, F> {
    store: &'a mut MapStore<F>,
    next: u32,
}

impl<F: Read + Write + Seek> Iterator for MapScan<'_, F> {
    type Item = Result<(u32, MapEntry), StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.store.count {
            return None;
        }
        let position = self.next;
        self.next += 1;
        Some(self.store.read_at(position).map(|entry| (position, entry)))
    }
}
