//! Randomized Kruskal: join random pairs of cells, unless they already share a tree

use rand::Rng;

use super::candidates::Candidates;
use crate::{progress::Progress, Grid};

/// Tree labels of the cells, as a union-find
///
/// Each cell starts in its own tree, labelled with its row-major index. Merging keeps the
/// label of the first cell, so the visible labels are the same as repainting every cell
/// of the second tree, while the structure underneath stays near-constant time.
#[derive(Debug, Clone)]
pub struct Forest {
    width: usize,
    /// Label slot of each cell
    cells: Box<[usize]>,
    /// Union-find parent of each slot
    parent: Box<[usize]>,
    /// Size of the tree, meaningful on roots
    size: Box<[usize]>,
    /// Visible label, meaningful on roots
    label: Box<[usize]>,
}

impl Forest {
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            cells: (0..n).collect(),
            parent: (0..n).collect(),
            size: vec![1; n].into_boxed_slice(),
            label: (0..n).collect(),
        }
    }

    fn slot(&self, [x, y]: [usize; 2]) -> usize {
        self.cells[y * self.width + x]
    }

    fn root(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            // path halving
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    /// Label of the tree containing the cell
    pub fn label(&mut self, pos: [usize; 2]) -> usize {
        let root = self.root(self.slot(pos));
        self.label[root]
    }

    /// Move a cell into the tree currently carrying `label`
    ///
    /// Only meaningful for a label that is still in use, or a fresh one below `width * height`.
    #[cfg(test)]
    pub fn set_label(&mut self, [x, y]: [usize; 2], label: usize) {
        let slot = (0..self.label.len())
            .find(|s| self.parent[*s] == *s && self.label[*s] == label)
            .unwrap_or(label);
        self.cells[y * self.width + x] = slot;
    }

    pub fn same_tree(&mut self, a: [usize; 2], b: [usize; 2]) -> bool {
        let (a, b) = (self.slot(a), self.slot(b));
        self.root(a) == self.root(b)
    }

    /// Join the trees of the two cells, keeping the label of the first one
    ///
    /// Returns `false` if they were already the same tree.
    pub fn merge(&mut self, a: [usize; 2], b: [usize; 2]) -> bool {
        let (a, b) = (self.slot(a), self.slot(b));
        let (ra, rb) = (self.root(a), self.root(b));
        if ra == rb {
            return false;
        }
        let label = self.label[ra];
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.label[big] = label;
        true
    }

    /// Number of distinct labels left on the cells
    pub fn tree_count(&mut self) -> usize {
        let mut roots: Vec<_> = (0..self.cells.len())
            .map(|i| {
                let slot = self.cells[i];
                self.root(slot)
            })
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }
}

pub(super) fn generate_pathways<R>(grid: &mut Grid, rng: &mut R, progress: &mut Progress)
where
    R: Rng + ?Sized,
{
    let mut candidates = Candidates::internal(grid);
    let mut forest = Forest::new(grid.width(), grid.height());
    let needed = grid.len() - 1;
    let mut joined = 0;
    log::trace!(
        "{}x{}: {} candidate walls",
        grid.width(),
        grid.height(),
        candidates.len()
    );

    while let Some(wall) = candidates.extract_randomly(rng) {
        let a = wall.position();
        let b = grid
            .neighbor(&wall)
            .expect("Internal candidates should have a neighbor");
        if forest.merge(a, b) {
            grid.delete_wall(&wall);
            joined += 1;
            progress.report(joined, needed);
        }
    }

    let trees = forest.tree_count();
    assert_eq!(
        trees, 1,
        "Kruskal left {trees} separate trees after exhausting all candidates"
    );
}
