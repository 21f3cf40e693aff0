use crc32fast::Hasher;

/// Derive a document seed from its uri using CRC32
pub fn document_seed(uri: &str) -> String {
    let mut buff = String::from(uri);
    if !uri.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within a document.
///
/// Ids are `{seed}-{n}` where the seed identifies the document and `n` is the
/// pre-order position at parse time. A reparse reuses the seed but restarts
/// the counter, so ids are not stable across reparses.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u32,
}

impl IdGenerator {
    pub fn new(uri: &str) -> Self {
        Self {
            seed: document_seed(uri),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Recover the seed of an existing node id (everything before the last `-`)
    pub fn from_existing_id(id: &str) -> Self {
        let seed = id.rsplit_once('-').map(|(s, _)| s).unwrap_or(id);
        Self::from_seed(seed)
    }

    pub fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
