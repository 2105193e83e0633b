//! Exact-duplicate suppression within one extraction call.

use std::collections::HashSet;
use std::fmt;

/// Digest of an item's title followed by its description.
///
/// Only used as a duplicate key; it never outlives the extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 16]);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// MD5 over the exact bytes of `title` immediately followed by `description`.
///
/// No separator, case folding or whitespace normalization is applied, so any
/// single-character difference yields a different fingerprint.
pub fn fingerprint(title: &str, description: &str) -> Fingerprint {
    let mut ctx = md5::Context::new();
    ctx.consume(title.as_bytes());
    ctx.consume(description.as_bytes());
    Fingerprint(ctx.compute().0)
}

/// Fingerprints already emitted during the current extraction call.
#[derive(Debug, Default)]
pub struct SeenSet {
    seen: HashSet<Fingerprint>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_duplicate(&self, fp: &Fingerprint) -> bool {
        self.seen.contains(fp)
    }

    pub fn record(&mut self, fp: Fingerprint) {
        self.seen.insert(fp);
    }
}
