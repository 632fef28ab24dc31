//! Recursive backtracker: a random depth-first walk, carving as it goes

use rand::{seq::SliceRandom, Rng};

use crate::{progress::Progress, Direction, Grid, Wall};

pub(super) fn generate_pathways<R>(grid: &mut Grid, rng: &mut R, progress: &mut Progress)
where
    R: Rng + ?Sized,
{
    let total = grid.len();
    let mut visited = vec![false; total].into_boxed_slice();

    let start = grid.position(rng.gen_range(0..total));
    visited[grid.index(&start)] = true;
    let mut carved = 1;
    let mut stack = vec![start];

    while let Some(&[x, y]) = stack.last() {
        let unvisited: Vec<_> = Direction::ALL
            .into_iter()
            .map(|d| Wall::new(x, y, d))
            .filter_map(|w| grid.neighbor(&w).map(|n| (w, n)))
            .filter(|(_, n)| !visited[grid.index(n)])
            .collect();
        let Some(&(wall, next)) = unvisited.choose(rng) else {
            // dead end
            stack.pop();
            continue;
        };
        grid.delete_wall(&wall);
        visited[grid.index(&next)] = true;
        carved += 1;
        progress.report(carved, total);
        stack.push(next);
    }

    debug_assert_eq!(carved, total);
}
