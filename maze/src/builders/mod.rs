//! Spanning-tree generation
//!
//! Every algorithm starts from a grid with all walls standing and removes exactly
//! `width * height - 1` internal walls, leaving a perfect maze: connected and without loops.

use std::fmt::Display;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{progress::Progress, FactoryError, Grid};

mod backtracker;
pub mod candidates;
pub mod kruskal;
mod prim;

/// Algorithm used to build the spanning tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum Builder {
    /// Recursive backtracker
    DepthFirst,
    Prim,
    Kruskal,
    /// Reserved, not implemented
    Eller,
}

impl Builder {
    /// Algorithms that can actually be run
    pub const IMPLEMENTED: [Builder; 3] = [Builder::DepthFirst, Builder::Prim, Builder::Kruskal];

    pub fn is_implemented(self) -> bool {
        Self::IMPLEMENTED.contains(&self)
    }

    /// Carve a perfect maze into `grid`
    ///
    /// # Panics
    /// If the result is not a spanning tree. That is a bug in the algorithm, not a runtime condition.
    pub fn build<R>(
        self,
        grid: &mut Grid,
        rng: &mut R,
        progress: &mut Progress,
    ) -> Result<(), FactoryError>
    where
        R: Rng + ?Sized,
    {
        log::debug!(
            "{}x{}: Generating pathways with {self}",
            grid.width(),
            grid.height()
        );
        match self {
            Builder::DepthFirst => backtracker::generate_pathways(grid, rng, progress),
            Builder::Prim => prim::generate_pathways(grid, rng, progress),
            Builder::Kruskal => kruskal::generate_pathways(grid, rng, progress),
            Builder::Eller => return Err(FactoryError::Unsupported(self)),
        }
        if let Err(err) = verify_spanning_tree(grid) {
            panic!("{self} produced an invalid maze: {err}")
        }
        Ok(())
    }
}

impl Display for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Builder::DepthFirst => "depth-first",
            Builder::Prim => "Prim",
            Builder::Kruskal => "Kruskal",
            Builder::Eller => "Eller",
        })
    }
}

/// Reason a grid is not a spanning tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("expected {expected} open internal walls, found {found}")]
    WallCount { expected: usize, found: usize },
    #[error("{0} cells cannot be reached from the first one")]
    Disconnected(usize),
}

/// Check that the open passages of the grid form a spanning tree
///
/// With `n - 1` edges on `n` nodes, connected is the same as acyclic.
pub fn verify_spanning_tree(grid: &Grid) -> Result<(), TreeError> {
    let expected = grid.len() - 1;
    let found = grid.open_internal_walls().count();
    if found != expected {
        return Err(TreeError::WallCount { expected, found });
    }
    let mut forest = kruskal::Forest::new(grid.width(), grid.height());
    for wall in grid.open_internal_walls() {
        let neighbor = grid
            .neighbor(&wall)
            .expect("Open internal walls have a neighbor");
        forest.merge(wall.position(), neighbor);
    }
    let origin = [0, 0];
    let unreached = grid
        .domain()
        .into_iter()
        .filter(|pos| !forest.same_tree(origin, *pos))
        .count();
    if unreached > 0 {
        return Err(TreeError::Disconnected(unreached));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_wyrand::WyRand;

    use super::*;
    use crate::{Direction, Wall};

    #[test]
    fn every_algorithm_builds_a_tree() {
        for builder in Builder::IMPLEMENTED {
            for seed in 0..5 {
                let mut grid = Grid::new(9, 6);
                let mut rng = WyRand::seed_from_u64(seed);
                builder
                    .build(&mut grid, &mut rng, &mut Progress::silent())
                    .unwrap();
                assert_eq!(verify_spanning_tree(&grid), Ok(()));
            }
        }
    }

    #[test]
    fn eller_is_refused() {
        let mut grid = Grid::new(4, 4);
        let before = grid.clone();
        let mut rng = WyRand::seed_from_u64(3);
        assert_eq!(
            Builder::Eller.build(&mut grid, &mut rng, &mut Progress::silent()),
            Err(FactoryError::Unsupported(Builder::Eller))
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn same_seed_same_maze() {
        for builder in Builder::IMPLEMENTED {
            let [a, b] = [(); 2].map(|_| {
                let mut grid = Grid::new(12, 12);
                let mut rng = WyRand::seed_from_u64(3);
                builder
                    .build(&mut grid, &mut rng, &mut Progress::silent())
                    .unwrap();
                grid
            });
            assert_eq!(a, b);
        }
    }

    #[test]
    fn closed_grid_is_not_a_tree() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            verify_spanning_tree(&grid),
            Err(TreeError::WallCount {
                expected: 8,
                found: 0
            })
        );
    }

    #[test]
    fn loop_with_detached_cell_is_not_a_tree() {
        // 2x2 ring plus a detached pair: right wall count, wrong shape
        let mut grid = Grid::new(3, 2);
        grid.delete_wall(&Wall::new(0, 0, Direction::East));
        grid.delete_wall(&Wall::new(0, 0, Direction::South));
        grid.delete_wall(&Wall::new(1, 0, Direction::South));
        grid.delete_wall(&Wall::new(0, 1, Direction::East));
        grid.delete_wall(&Wall::new(2, 0, Direction::South));
        assert_eq!(
            verify_spanning_tree(&grid),
            Err(TreeError::Disconnected(2))
        );
    }

    #[test]
    #[should_panic(expected = "invalid maze")]
    fn broken_tree_is_fatal() {
        // starting from an already opened grid, the result cannot be a tree
        let mut grid = Grid::new(4, 4);
        grid.delete_wall(&Wall::new(1, 1, Direction::East));
        grid.delete_wall(&Wall::new(1, 1, Direction::South));
        grid.delete_wall(&Wall::new(2, 1, Direction::South));
        grid.delete_wall(&Wall::new(1, 2, Direction::East));
        let mut rng = WyRand::seed_from_u64(3);
        let _ = Builder::DepthFirst.build(&mut grid, &mut rng, &mut Progress::silent());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]
        #[test]
        fn any_seed_and_shape_gives_a_tree(
            seed in any::<u64>(),
            width in 1_usize..16,
            height in 1_usize..16,
            selector in 0_usize..3,
        ) {
            let builder = Builder::IMPLEMENTED[selector];
            let mut grid = Grid::new(width, height);
            let mut rng = WyRand::seed_from_u64(seed);
            builder.build(&mut grid, &mut rng, &mut Progress::silent()).unwrap();
            prop_assert_eq!(verify_spanning_tree(&grid), Ok(()));
            for [x, y] in grid.domain() {
                for d in Direction::ALL {
                    let wall = Wall::new(x, y, d);
                    if let Some([nx, ny]) = grid.neighbor(&wall) {
                        prop_assert_eq!(grid.has_wall(x, y, d), grid.has_wall(nx, ny, d.opposite()));
                    } else {
                        prop_assert!(grid.has_wall(x, y, d), "border opened at {x},{y}");
                    }
                }
            }
        }
    }
}
