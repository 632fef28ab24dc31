use bitflags::bitflags;

bitflags! {
    /// Walls around a cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Walls: u8 {
        const North = 0b0001;
        const East  = 0b0010;
        const South = 0b0100;
        const West  = 0b1000;
    }
}

/// Side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, in sweep order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline(always)]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Step in cell coordinates, `y` growing southward
    #[inline(always)]
    #[must_use]
    pub const fn delta(self) -> [isize; 2] {
        match self {
            Direction::North => [0, -1],
            Direction::East => [1, 0],
            Direction::South => [0, 1],
            Direction::West => [-1, 0],
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn wall(self) -> Walls {
        match self {
            Direction::North => Walls::North,
            Direction::East => Walls::East,
            Direction::South => Walls::South,
            Direction::West => Walls::West,
        }
    }

    /// Move one step from `pos`, `None` if it would leave the positive quadrant
    #[inline(always)]
    #[must_use]
    pub const fn step(self, [x, y]: [usize; 2]) -> Option<[usize; 2]> {
        let [dx, dy] = self.delta();
        match (x.checked_add_signed(dx), y.checked_add_signed(dy)) {
            (Some(x), Some(y)) => Some([x, y]),
            _ => None,
        }
    }
}

/// A wall, located at a cell on a given side
///
/// Two walls compare equal only if cell and side are identical.
/// Use [`Wall::same_wall`] to recognize the same partition seen from the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
}

impl Wall {
    #[inline(always)]
    #[must_use]
    pub const fn new(x: usize, y: usize, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    #[inline(always)]
    #[must_use]
    pub const fn position(&self) -> [usize; 2] {
        [self.x, self.y]
    }

    /// Cell on the other side of the wall
    ///
    /// It can be outside the grid if this is a border wall.
    /// ```
    /// use mazegen::{Direction, Wall};
    ///
    /// assert_eq!(Wall::new(2, 3, Direction::North).neighbor(), Some([2, 2]));
    /// assert_eq!(Wall::new(0, 3, Direction::West).neighbor(), None);
    /// ```
    #[inline(always)]
    #[must_use]
    pub const fn neighbor(&self) -> Option<[usize; 2]> {
        self.direction.step([self.x, self.y])
    }

    /// The same partition, described from the neighboring cell
    #[inline(always)]
    #[must_use]
    pub const fn mirror(&self) -> Option<Wall> {
        match self.neighbor() {
            Some([x, y]) => Some(Wall::new(x, y, self.direction.opposite())),
            None => None,
        }
    }

    /// Check if the two walls divide the same pair of cells from opposite sides
    /// ```
    /// use mazegen::{Direction, Wall};
    ///
    /// let a = Wall::new(1, 1, Direction::East);
    /// assert!(a.same_wall(&Wall::new(2, 1, Direction::West)));
    /// assert!(!a.same_wall(&a));
    /// assert!(!a.same_wall(&Wall::new(2, 1, Direction::East)));
    /// ```
    #[must_use]
    pub fn same_wall(&self, other: &Wall) -> bool {
        self.direction.opposite() == other.direction && self.neighbor() == Some(other.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn mirror_is_same_wall_both_ways() {
        for d in Direction::ALL {
            let wall = Wall::new(5, 5, d);
            let mirror = wall.mirror().unwrap();
            assert!(wall.same_wall(&mirror));
            assert!(mirror.same_wall(&wall));
            assert_ne!(wall, mirror);
            assert_eq!(mirror.mirror(), Some(wall));
        }
    }

    #[test]
    fn walls_flags_are_distinct() {
        let all = Direction::ALL
            .into_iter()
            .fold(Walls::empty(), |acc, d| acc | d.wall());
        assert_eq!(all, Walls::all());
    }
}
