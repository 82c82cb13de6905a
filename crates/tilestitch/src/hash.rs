//! Content hashing of build inputs
//!
//! Every field is length-prefixed so that moving bytes between adjacent
//! fields always changes the digest. Not a security boundary.

use serde::Serialize;
use sha2::{Digest, Sha256};
use tilestitch_atlas::SourceImage;
use tilestitch_core::ContentHash;

#[derive(Clone, Default)]
pub struct ContentHasher {
    digest: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(&mut self, bytes: &[u8]) {
        self.digest.update((bytes.len() as u64).to_le_bytes());
        self.digest.update(bytes);
    }

    /// Hash the canonical JSON form of a record
    pub fn record<T: Serialize>(&mut self, record: &T) -> Result<(), serde_json::Error> {
        let json = serde_json::to_vec(record)?;
        self.field(&json);
        Ok(())
    }

    pub fn image(&mut self, image: &SourceImage) {
        self.field(&image.width.to_le_bytes());
        self.field(&image.height.to_le_bytes());
        self.field(&[image.channels]);
        self.field(&image.pixels);
    }

    pub fn finish(self) -> ContentHash {
        ContentHash(self.digest.finalize().into())
    }
}
