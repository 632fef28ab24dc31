//! Distance of every cell from the exit, following open passages

use std::collections::VecDeque;

use rand::Rng;

use crate::{progress::Progress, Grid};

/// Breadth-first distances to the exit
///
/// The exit itself has distance [`DistanceField::EXIT_DISTANCE`], and cells that cannot reach it
/// have [`DistanceField::INFINITY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    dists: Box<[u32]>,
    exit: [usize; 2],
    start: [usize; 2],
    max: u32,
}

impl DistanceField {
    /// Marker for unreachable cells
    pub const INFINITY: u32 = u32::MAX;
    /// Distance assigned to the exit itself
    pub const EXIT_DISTANCE: u32 = 1;

    /// Flood the grid from `exit`
    pub fn compute(grid: &Grid, exit: [usize; 2]) -> Self {
        assert!(grid.contains(&exit), "{exit:?}: Exit outside of the grid");
        let mut dists = vec![Self::INFINITY; grid.len()].into_boxed_slice();
        let mut queue = VecDeque::new();
        dists[grid.index(&exit)] = Self::EXIT_DISTANCE;
        queue.push_back(exit);

        while let Some(current) = queue.pop_front() {
            let next_dist = dists[grid.index(&current)] + 1;
            for neighbor in grid.open_neighbors(current[0], current[1]) {
                let idx = grid.index(&neighbor);
                if dists[idx] == Self::INFINITY {
                    dists[idx] = next_dist;
                    queue.push_back(neighbor);
                }
            }
        }

        let mut field = Self {
            width: grid.width(),
            height: grid.height(),
            dists,
            exit,
            start: exit,
            max: Self::EXIT_DISTANCE,
        };
        if let Some(start) = field.farthest(|_| true) {
            field.start = start;
            field.max = field.distance(start[0], start[1]);
        }
        field
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn distance(&self, x: usize, y: usize) -> u32 {
        assert!(
            x < self.width && y < self.height,
            "{:?}: Outside of the {}x{} field",
            [x, y],
            self.width,
            self.height
        );
        self.dists[y * self.width + x]
    }

    #[inline(always)]
    pub fn is_reachable(&self, x: usize, y: usize) -> bool {
        self.distance(x, y) != Self::INFINITY
    }

    pub fn exit_position(&self) -> [usize; 2] {
        self.exit
    }

    /// Cell farthest from the exit, first in row-major order on ties
    pub fn start_position(&self) -> [usize; 2] {
        self.start
    }

    /// Largest finite distance
    pub fn max_distance(&self) -> u32 {
        self.max
    }

    /// Number of cells the exit cannot be reached from
    ///
    /// Carving rooms only opens walls, so mazes from the factory never have any.
    pub fn unreachable_count(&self) -> usize {
        self.dists.iter().filter(|d| **d == Self::INFINITY).count()
    }

    /// Adjacent open cell one step closer to the exit
    ///
    /// `None` on the exit itself and on unreachable cells.
    pub fn neighbor_closer_to_exit(&self, grid: &Grid, x: usize, y: usize) -> Option<[usize; 2]> {
        let dist = self.distance(x, y);
        if dist == Self::INFINITY || dist == Self::EXIT_DISTANCE {
            return None;
        }
        grid.open_neighbors(x, y)
            .find(|[nx, ny]| self.distance(*nx, *ny) == dist - 1)
    }

    /// Row-major first reachable cell with the largest distance among the accepted ones
    fn farthest(&self, accept: impl Fn([usize; 2]) -> bool) -> Option<[usize; 2]> {
        let mut best: Option<([usize; 2], u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let d = self.distance(x, y);
                if d == Self::INFINITY || !accept([x, y]) {
                    continue;
                }
                if best.map_or(true, |(_, b)| d > b) {
                    best = Some(([x, y], d));
                }
            }
        }
        best.map(|(pos, _)| pos)
    }
}

/// Choose exit and entrance on the border, and compute the final distances
///
/// A provisional flood from a random cell picks the farthest border cell as the exit.
/// The entrance is then the border cell farthest from the exit.
pub fn place_exit<R>(grid: &mut Grid, rng: &mut R, progress: &mut Progress) -> DistanceField
where
    R: Rng + ?Sized,
{
    let seed = grid.position(rng.gen_range(0..grid.len()));
    let provisional = DistanceField::compute(grid, seed);
    progress.report(1, 3);
    let exit = provisional
        .farthest(|pos| grid.is_border(pos))
        .unwrap_or([0, 0]);
    grid.mark_exit(exit[0], exit[1]);

    let field = DistanceField::compute(grid, exit);
    progress.report(2, 3);
    let entrance = field
        .farthest(|pos| pos != exit && grid.is_border(pos))
        .unwrap_or(exit);
    grid.mark_entrance(entrance[0], entrance[1]);
    log::debug!(
        "{}x{}: Exit at {exit:?}, entrance at {entrance:?}, start at {:?} ({} steps)",
        grid.width(),
        grid.height(),
        field.start_position(),
        field.max_distance()
    );
    progress.report(3, 3);
    field
}
