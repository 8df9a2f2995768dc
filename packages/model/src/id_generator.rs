use crate::node::NodeId;
use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Derive an id seed from a document's root id using CRC32
pub fn get_document_seed(root_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(root_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes created by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    /// Generator seeded from the document's root id
    pub fn for_document(root_id: &str) -> Self {
        Self::from_seed(get_document_seed(root_id))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Generate the next id for which `taken` returns false
    pub fn new_id_where(&mut self, mut taken: impl FnMut(&str) -> bool) -> NodeId {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    /// Move the counter past every `{seed}-{n}` among `existing`, so ids
    /// already present in a loaded document are never handed out again
    pub fn skip_past<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        let prefix = format!("{}-", self.seed);
        for id in existing {
            if let Some(n) = id.strip_prefix(&prefix).and_then(|n| n.parse::<u64>().ok()) {
                self.count = self.count.max(n);
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_is_stable() {
        let a = get_document_seed("root");
        let b = get_document_seed("root");
        assert_eq!(a, b);
        assert_ne!(a, get_document_seed("other-root"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("doc");

        assert_eq!(gen.new_id(), "doc-1");
        assert_eq!(gen.new_id(), "doc-2");
        assert_eq!(gen.count(), 2);
    }

    #[test]
    fn test_new_id_where_skips_taken_ids() {
        let mut gen = IdGenerator::from_seed("doc");
        let id = gen.new_id_where(|candidate| candidate == "doc-1" || candidate == "doc-2");
        assert_eq!(id, "doc-3");
    }

    #[test]
    fn test_skip_past_existing_ids() {
        let mut gen = IdGenerator::from_seed("doc");
        gen.skip_past(["doc-4", "doc-x", "other-9", "doc-2", "doc-"]);

        assert_eq!(gen.count(), 4);
        assert_eq!(gen.new_id(), "doc-5");

        gen.skip_past(["doc-1"]);
        assert_eq!(gen.new_id(), "doc-6");
    }
}
