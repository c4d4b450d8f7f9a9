//! String pool with stable-index interning
//!
//! Names and paths are stored once in a pool of NUL-terminated strings and
//! referenced by index. The first occurrence of a string fixes its index; the
//! pool is serialized in first-interned order.

use hashbrown::HashMap;
use std::io::Write;

use crate::error::{OrbError, Result};

#[derive(Debug, Default)]
pub struct StringPool {
    strings: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl StringPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `text`, appending it if it was not interned yet
    pub fn intern(&mut self, text: &str) -> u32 {
        if let Some(&index) = self.lookup.get(text) {
            return index;
        }
        let index = self.strings.len() as u32;
        self.strings.push(text.to_owned());
        self.lookup.insert(text.to_owned(), index);
        index
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Strings in interning order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Serialized size: every string plus its NUL terminator
    pub fn byte_len(&self) -> u64 {
        self.strings.iter().map(|s| s.len() as u64 + 1).sum()
    }

    /// Write all strings back to back, each followed by a NUL byte
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<u64> {
        let mut written = 0u64;
        for (index, text) in self.strings.iter().enumerate() {
            if text.as_bytes().contains(&0) {
                return Err(OrbError::InteriorNul {
                    owner: "string",
                    index,
                    text: text.clone(),
                });
            }
            w.write_all(text.as_bytes())?;
            w.write_all(&[0])?;
            written += text.len() as u64 + 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_returns_stable_indices() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern("diffuse"), 0);
        assert_eq!(pool.intern("tex/d.png"), 1);
        assert_eq!(pool.intern("diffuse"), 0);
        assert_eq!(pool.intern("tex/d.png"), 1);
        assert_eq!(pool.intern(""), 2);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(1), Some("tex/d.png"));
        assert_eq!(pool.get(3), None);
    }

    #[test]
    fn test_no_duplicates_and_first_seen_order() {
        let mut pool = StringPool::new();
        for name in ["b", "a", "b", "c", "a", "c", "d"] {
            pool.intern(name);
        }
        let strings: Vec<&str> = pool.iter().collect();
        assert_eq!(strings, vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_write_nul_terminated() {
        let mut pool = StringPool::new();
        pool.intern("diffuse");
        pool.intern("tex/d.png");

        let mut out = Vec::new();
        let written = pool.write_to(&mut out).unwrap();
        assert_eq!(out, b"diffuse\0tex/d.png\0");
        assert_eq!(written, 18);
        assert_eq!(pool.byte_len(), 18);
    }

    #[test]
    fn test_empty_pool_writes_nothing() {
        let pool = StringPool::new();
        let mut out = Vec::new();
        assert_eq!(pool.write_to(&mut out).unwrap(), 0);
        assert!(out.is_empty());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_interior_nul_rejected() {
        let mut pool = StringPool::new();
        pool.intern("ok");
        pool.intern("bad\0name");

        let mut out = Vec::new();
        let err = pool.write_to(&mut out).unwrap_err();
        assert!(matches!(err, OrbError::InteriorNul { owner: "string", index: 1, .. }));
    }
}
