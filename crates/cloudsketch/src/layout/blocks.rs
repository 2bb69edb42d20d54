//! Block composition and layout hint relocation.
//!
//! The siblings of one tree level are arranged into blocks: columns placed
//! left to right, each stacking its elements top to bottom. Blocks hold
//! indices into the sibling slice, so moving an element between blocks is
//! plain index splicing and the element tree itself is never reordered.

use std::fmt;

use log::{debug, trace};

use cloudsketch_core::semantic::{Direction, Element, Path};

use super::LayoutError;

/// Slot of an element inside [`Blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    block: usize,
    slot: usize,
    element: usize,
}

/// Ordered columns of sibling indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks {
    blocks: Vec<Vec<usize>>,
}

impl Blocks {
    /// Arranges `elements` into blocks following the dependency order of
    /// `paths`, then applies the `up`, `down` and `left` layout hints.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RelocationLimit`] when applying the hints takes
    /// more than `relocation_limit` moves, which happens when hints contradict
    /// each other.
    pub fn compose(
        elements: &[Element],
        paths: &[Path],
        relocation_limit: usize,
    ) -> Result<Self, LayoutError> {
        let mut remaining: Vec<usize> = (0..elements.len()).collect();
        let mut blocks = Vec::new();

        while !remaining.is_empty() {
            let mut block = peel_non_dependents(elements, paths, &mut remaining);
            if block.is_empty() {
                // Cyclic paths: take the first remaining element as is.
                block.push(remaining.remove(0));
            }
            blocks.push(block);
        }

        let mut layout = Self { blocks };
        layout.relocate(elements, paths, relocation_limit)?;

        let blocks = layout.ids(elements);
        debug!(blocks:?; "Composed layout blocks");

        Ok(layout)
    }

    /// Iterates the blocks from left to right.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.blocks.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The element ids of every block, for logging and assertions.
    pub fn ids<'a>(&self, elements: &'a [Element]) -> Vec<Vec<&'a str>> {
        self.blocks
            .iter()
            .map(|block| block.iter().map(|&index| elements[index].id()).collect())
            .collect()
    }

    fn relocate(
        &mut self,
        elements: &[Element],
        paths: &[Path],
        relocation_limit: usize,
    ) -> Result<(), LayoutError> {
        let mut moves = 0;
        while self.relocate_once(elements, paths) {
            moves += 1;
            if moves > relocation_limit {
                return Err(LayoutError::RelocationLimit);
            }
        }
        self.blocks.retain(|block| !block.is_empty());
        Ok(())
    }

    /// Applies the first layout hint that is not satisfied yet.
    ///
    /// Returns false when every hint already holds.
    fn relocate_once(&mut self, elements: &[Element], paths: &[Path]) -> bool {
        for path in paths {
            let (Some(start), Some(end)) = (
                self.position(elements, path.start()),
                self.position(elements, path.end()),
            ) else {
                continue;
            };
            // Both ends live inside one element; the hint belongs to a nested level.
            if start.element == end.element {
                continue;
            }

            let moved = match path.direction() {
                Direction::Right => false,
                Direction::Down | Direction::Up if start.block == end.block => false,
                Direction::Down => {
                    self.move_next_to(elements, path.start(), end, 1);
                    true
                }
                Direction::Up => {
                    self.move_next_to(elements, path.start(), end, 0);
                    true
                }
                Direction::Left if end.block < start.block => false,
                Direction::Left => {
                    self.move_left_of(start.block, end);
                    true
                }
            };

            if moved {
                trace!(path:%; "Relocated element for layout hint");
                return true;
            }
        }
        false
    }

    /// Moves the element at `end` into the block of `anchor_id`, `after`
    /// slots past the anchor (0 for before, 1 for after).
    fn move_next_to(
        &mut self,
        elements: &[Element],
        anchor_id: &str,
        end: Position,
        after: usize,
    ) {
        let index = self.blocks[end.block].remove(end.slot);
        if let Some(anchor) = self.position(elements, anchor_id) {
            self.blocks[anchor.block].insert(anchor.slot + after, index);
        }
    }

    /// Moves the element at `end` to the back of the block left of `block`,
    /// opening a new first block when there is none.
    fn move_left_of(&mut self, block: usize, end: Position) {
        let index = self.blocks[end.block].remove(end.slot);
        if block > 0 {
            self.blocks[block - 1].push(index);
        } else {
            self.blocks.insert(0, vec![index]);
        }
    }

    /// Finds the top-level element containing `id`.
    fn position(&self, elements: &[Element], id: &str) -> Option<Position> {
        self.blocks.iter().enumerate().find_map(|(block, indices)| {
            indices
                .iter()
                .position(|&index| elements[index].contains(id))
                .map(|slot| Position {
                    block,
                    slot,
                    element: indices[slot],
                })
        })
    }
}

/// Removes and returns, in order, every remaining element that no current
/// path points into.
///
/// A path is current at this level unless one remaining element holds both
/// of its ends. Paths starting outside the remaining elements are ignored.
fn peel_non_dependents(
    elements: &[Element],
    paths: &[Path],
    remaining: &mut Vec<usize>,
) -> Vec<usize> {
    let holds = |index: &usize, id: &str| elements[*index].contains(id);

    let mut dependents = Vec::new();
    for path in paths {
        let nested = remaining
            .iter()
            .any(|index| holds(index, path.start()) && holds(index, path.end()));
        if nested || !remaining.iter().any(|index| holds(index, path.start())) {
            continue;
        }
        dependents.extend(
            remaining
                .iter()
                .copied()
                .filter(|index| holds(index, path.end())),
        );
    }

    let (peeled, kept) = remaining
        .iter()
        .copied()
        .partition(|index| !dependents.contains(index));
    *remaining = kept;
    peeled
}

impl fmt::Display for Blocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks: Vec<String> = self
            .blocks
            .iter()
            .map(|block| {
                let indices: Vec<String> = block.iter().map(usize::to_string).collect();
                format!("{{{}}}", indices.join(", "))
            })
            .collect();
        write!(f, "blocks: {{{}}}", blocks.join(", "))
    }
}
