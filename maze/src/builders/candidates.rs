use std::collections::HashSet;

use rand::Rng;

use crate::{Direction, Grid, Wall};

/// A pool of walls waiting to be considered for removal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates(Vec<Wall>);

impl Candidates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wall standing in the grid, listed once
    ///
    /// The sweep goes row by row, then by direction. When a wall and its mirror are both found,
    /// the orientation met first is kept.
    pub fn standing(grid: &Grid) -> Self {
        let mut seen = HashSet::new();
        let mut walls = vec![];
        for [x, y] in grid.domain() {
            for d in Direction::ALL {
                let wall = Wall::new(x, y, d);
                if !grid.wall_exists(&wall) {
                    continue;
                }
                if wall.mirror().is_some_and(|m| seen.contains(&m)) {
                    continue;
                }
                seen.insert(wall);
                walls.push(wall);
            }
        }
        Self(walls)
    }

    /// Standing walls that could be torn down, i.e. not on the border
    pub fn internal(grid: &Grid) -> Self {
        let mut candidates = Self::standing(grid);
        candidates.0.retain(|w| !grid.is_border_wall(w));
        candidates
    }

    /// Internal walls of a single cell, still standing
    pub fn around(grid: &Grid, [x, y]: [usize; 2]) -> impl Iterator<Item = Wall> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| Wall::new(x, y, d))
            .filter(move |w| grid.neighbor(w).is_some() && grid.wall_exists(w))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.0.iter()
    }

    /// Pick a uniformly random candidate, removing it from the pool
    pub fn extract_randomly<R>(&mut self, rng: &mut R) -> Option<Wall>
    where
        R: Rng + ?Sized,
    {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.swap_remove(rng.gen_range(0..self.0.len())))
    }
}

impl Extend<Wall> for Candidates {
    fn extend<T: IntoIterator<Item = Wall>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}
