//! # Blocks
//!
//! Static tile descriptors. Chunks store only a `u8` id per cell; the id
//! indexes the world's `BlockCatalog`.

use chunkmill_shared::Vec3;

/// A static world-tile descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// Catalog id.
    pub id: u8,
    /// Display name.
    pub name: String,
    /// Reference position.
    pub position: Vec3,
    /// Hits before breaking.
    pub durability: i32,
    /// Texture reference.
    pub texture_ref: i32,
    /// Block type.
    pub block_type: i32,
    /// Whether the block can be broken.
    pub breakable: bool,
    /// Whether the block is drawn.
    pub visible: bool,
}

impl Block {
    /// Default catalog entry for `id`.
    #[must_use]
    pub fn standard(id: u8) -> Self {
        let f = f32::from(id);
        Self {
            id,
            name: format!("Block{id}"),
            position: Vec3::splat(f),
            durability: 100,
            texture_ref: 1,
            block_type: 1,
            breakable: true,
            visible: true,
        }
    }
}

/// The world's read-only block table, built once before the first tick.
#[derive(Clone, Debug, Default)]
pub struct BlockCatalog {
    blocks: Box<[Block]>,
}

impl BlockCatalog {
    /// Builds a catalog of `count` standard blocks, ids `0..count`.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds 256 (ids are `u8`). `WorldConfig::validate`
    /// rejects such configs first.
    #[must_use]
    pub fn standard(count: usize) -> Self {
        assert!(count <= 256, "block catalog cannot exceed 256 entries");
        let blocks = (0..=u8::MAX)
            .take(count)
            .map(Block::standard)
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { blocks }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True if the catalog has no entries (before `build_initial`).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Looks up a block by id.
    #[inline]
    #[must_use]
    pub fn get(&self, id: u8) -> Option<&Block> {
        self.blocks.get(usize::from(id))
    }

    /// All entries in id order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_block() {
        let block = Block::standard(17);
        assert_eq!(block.id, 17);
        assert_eq!(block.name, "Block17");
        assert_eq!(block.position, Vec3::splat(17.0));
        assert_eq!(block.durability, 100);
        assert!(block.breakable && block.visible);
    }

    #[test]
    fn test_full_catalog() {
        let catalog = BlockCatalog::standard(256);
        assert_eq!(catalog.len(), 256);
        assert_eq!(catalog.get(255).map(|b| b.id), Some(255));
        for (index, block) in catalog.as_slice().iter().enumerate() {
            assert_eq!(usize::from(block.id), index);
        }
    }

    #[test]
    fn test_partial_catalog_lookup() {
        let catalog = BlockCatalog::standard(8);
        assert!(catalog.get(7).is_some());
        assert!(catalog.get(8).is_none());
        assert!(BlockCatalog::default().is_empty());
    }
}
