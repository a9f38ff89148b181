//! Reference-counted arena for ZX0 decision nodes.
//!
//! Nodes are appended to a single growable buffer (the Rust analogue of the
//! fixed-size slabs described by the spec: the buffer grows in one contiguous
//! allocation rather than distinct slabs, but the same steady-state bound holds
//! because recycled slots are reused before the buffer grows further). A free
//! list recycles nodes whose reference count reaches zero, so peak memory tracks
//! the live DAG frontier rather than the total number of nodes ever created.

use std::collections::VecDeque;

use crate::error::CompressError;

/// Upper bound on the number of decision nodes the arena will allocate before
/// reporting resource exhaustion. Chosen to match the spec's example slab
/// configuration (50,000 slabs of 10,000 nodes each) while being expressed as a
/// single cap rather than a slab count, since the arena here is one contiguous
/// buffer.
const MAX_BLOCKS: usize = 50_000 * 10_000;

/// A single decision node: "the optimal way to encode up to input position
/// `index`, ending in an action characterized by `offset`".
pub(crate) struct Block {
    pub bits: u32,
    pub index: i32,
    pub offset: u32,
    /// Index of the predecessor node on this path (the `chain` edge), or `0`
    /// for the synthetic root.
    pub next_index: usize,
    refcount: u32,
}

/// Null block index; slot `0` is a permanent sentinel node and is never
/// recycled or pointed to by a real chain edge.
pub(crate) const NULL: usize = 0;

pub(crate) struct Allocator {
    free_list: VecDeque<u32>,
    blocks: Vec<Block>,
}

impl Allocator {
    pub(crate) fn new() -> Self {
        Self {
            free_list: VecDeque::new(),
            blocks: vec![Block {
                bits: 0,
                index: 0,
                offset: 0,
                next_index: NULL,
                refcount: 0,
            }],
        }
    }

    /// Point `*slot` at the existing node `next_index`, adjusting reference
    /// counts and recycling the node `*slot` previously held if its count
    /// drops to zero.
    pub(crate) fn assign(&mut self, slot: &mut usize, next_index: usize) {
        self.blocks[next_index].refcount += 1;
        self.release(*slot);
        *slot = next_index;
    }

    /// Allocate (or recycle) a new node with the given fields and point
    /// `*slot` at it, releasing whatever `*slot` previously held.
    pub(crate) fn assign_new(
        &mut self,
        slot: &mut usize,
        bits: u32,
        index: i32,
        offset: u32,
        next_index: usize,
    ) -> Result<(), CompressError> {
        if next_index != NULL {
            self.blocks[next_index].refcount += 1;
        }
        self.release(*slot);

        let block = Block {
            bits,
            index,
            offset,
            next_index,
            refcount: 1,
        };

        *slot = if let Some(i) = self.free_list.pop_front() {
            self.blocks[i as usize] = block;
            i as usize
        } else {
            if self.blocks.len() >= MAX_BLOCKS {
                return Err(CompressError::ResourceExhausted {
                    size: index.max(0) as usize + 1,
                });
            }

            self.blocks
                .try_reserve(1)
                .map_err(|_| CompressError::ResourceExhausted {
                    size: index.max(0) as usize + 1,
                })?;
            self.blocks.push(block);
            self.blocks.len() - 1
        };

        Ok(())
    }

    /// Decrement `index`'s reference count and, if it reaches zero, recycle it
    /// and cascade the release onto its `next_index` predecessor. This keeps
    /// `refs` equal to the number of incoming chain edges plus working-array
    /// slots that point at a node, as required for the arena's memory bound:
    /// a node can only become unreachable once nothing on its own path or the
    /// working arrays still needs it.
    fn release(&mut self, mut index: usize) {
        while index != NULL {
            self.blocks[index].refcount -= 1;

            if self.blocks[index].refcount != 0 {
                break;
            }

            let predecessor = self.blocks[index].next_index;
            self.free_list.push_back(index as u32);
            index = predecessor;
        }
    }

    pub(crate) fn get(&self, index: usize) -> &Block {
        &self.blocks[index]
    }
}
