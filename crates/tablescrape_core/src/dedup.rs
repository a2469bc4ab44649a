use std::collections::HashSet;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::Row;

/// SHA-256 over the row's key/value pairs in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(row: &Row) -> Self {
        let mut hasher = Sha256::new();
        // Length prefixes keep ("ab","c") and ("a","bc") apart.
        for (key, value) in row.iter() {
            hasher.update((key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update((value.len() as u64).to_le_bytes());
            hasher.update(value.as_bytes());
        }
        Self(hasher.finalize().into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Exact-duplicate suppression for one run.
#[derive(Debug, Clone, Default)]
pub struct DedupEngine {
    seen: HashSet<Fingerprint>,
}

impl DedupEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false and remembers the row the first time it is seen.
    pub fn is_duplicate(&mut self, row: &Row) -> bool {
        !self.seen.insert(Fingerprint::of(row))
    }

    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
