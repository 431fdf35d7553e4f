//! Splitting content into block chains and reassembling it
//!
//! Encoding partitions content into consecutive fixed-size slices in original
//! order, one block per slice, each linked to the next by its deterministic
//! reference. Decoding walks the chain from the head and concatenates
//! payloads until the end-of-chain flag or the first missing block.

use crate::block_store::{BlockRef, BlockStore, BLOCK_SIZE};
use crate::StoreError;

/// Encodes and decodes content chains over a [`BlockStore`]
#[derive(Debug)]
pub struct ChainCodec {
    store: BlockStore,
}

impl ChainCodec {
    /// Creates a codec over the given store
    pub fn new(store: BlockStore) -> Self {
        Self { store }
    }

    /// Returns the underlying block store
    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    /// Writes `content` as a block chain for `name` and returns the head ref
    ///
    /// Empty content still writes exactly one block with an empty payload.
    pub fn encode(&self, content: &str, name: &str) -> Result<BlockRef, StoreError> {
        let chunks = split_chunks(content, BLOCK_SIZE);
        let last = chunks.len() - 1;
        for (index, chunk) in chunks.iter().enumerate() {
            let next_ref = if index < last {
                Some(self.store.block_ref(name, index + 1))
            } else {
                None
            };
            self.store
                .write_block(name, index, chunk, next_ref, index == last)?;
        }
        Ok(self.store.block_ref(name, 0))
    }

    /// Reassembles content by traversal from `head`
    ///
    /// Traversal stops at the first block flagged `is_last`, or early at the
    /// first missing block; whatever accumulated so far is returned. A broken
    /// chain yields partial content, not an error.
    pub fn decode(&self, head: &BlockRef) -> Result<String, StoreError> {
        let mut content = String::new();
        let mut current = Some(head.clone());
        while let Some(reference) = current {
            let block = match self.store.read_block(&reference)? {
                Some(block) => block,
                None => break,
            };
            content.push_str(&block.payload);
            if block.is_last {
                break;
            }
            current = block.next_ref;
        }
        Ok(content)
    }
}

/// Splits content into slices of at most `max_bytes`, never cutting a UTF-8
/// sequence. Empty content yields a single empty slice.
fn split_chunks(content: &str, max_bytes: usize) -> Vec<&str> {
    if content.is_empty() {
        return vec![""];
    }
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < content.len() {
        let mut end = usize::min(start + max_bytes, content.len());
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        chunks.push(&content[start..end]);
        start = end;
    }
    chunks
}
