//! Randomized Prim: grow a single tree, absorbing a random cell of its frontier at a time

use rand::Rng;

use super::candidates::Candidates;
use crate::{progress::Progress, Grid};

pub(super) fn generate_pathways<R>(grid: &mut Grid, rng: &mut R, progress: &mut Progress)
where
    R: Rng + ?Sized,
{
    let total = grid.len();
    let mut visited = vec![false; total].into_boxed_slice();
    let mut walls = Candidates::new();

    // choosing a random starting point
    let start = grid.position(rng.gen_range(0..total));
    visited[grid.index(&start)] = true;
    let mut absorbed = 1;
    walls.extend(Candidates::around(grid, start));

    while let Some(wall) = walls.extract_randomly(rng) {
        let next = grid
            .neighbor(&wall)
            .expect("Frontier walls should be internal");
        let idx = grid.index(&next);
        if visited[idx] {
            // both sides are in the tree already
            continue;
        }
        // adding the passage
        grid.delete_wall(&wall);
        visited[idx] = true;
        absorbed += 1;
        progress.report(absorbed, total);
        // walls towards already visited cells are filtered when drawn
        walls.extend(Candidates::around(grid, next));
    }

    debug_assert_eq!(absorbed, total);
}
