use bitflags::bitflags;

use crate::{Direction, Rect, Wall, Walls};

/// Identifier of a carved room
pub type RoomId = u16;

bitflags! {
    /// Special roles of a border cell
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Marks: u8 {
        const Exit     = 0b01;
        const Entrance = 0b10;
    }
}

/// A single cell of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub walls: Walls,
    pub room: Option<RoomId>,
    pub marks: Marks,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            walls: Walls::all(),
            room: None,
            marks: Marks::empty(),
        }
    }
}

/// Cells of a maze, with their walls
///
/// Walls are stored on both sides of a partition, and every mutation keeps the two copies in sync.
/// The outer border stays closed, with the only exception of the exit and the entrance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Box<[Cell]>,
    exit: Option<[usize; 2]>,
    entrance: Option<[usize; 2]>,
}

impl Grid {
    /// Grid with every wall standing
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "A grid needs at least one cell");
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height].into_boxed_slice(),
            exit: None,
            entrance: None,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Rect covering the whole grid
    #[inline(always)]
    pub fn domain(&self) -> Rect {
        Rect::with_shape(self.width, self.height)
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline(always)]
    pub fn contains(&self, pos: &[usize; 2]) -> bool {
        self.domain().contains(pos)
    }

    /// Row-major index of a cell
    ///
    /// # Panics
    /// If the cell is outside of the grid.
    #[inline(always)]
    pub fn index(&self, pos: &[usize; 2]) -> usize {
        assert!(
            self.contains(pos),
            "{pos:?}: Outside of the {}x{} grid",
            self.width,
            self.height
        );
        self.domain().linearized().global_to_linear(pos)
    }

    /// Cell at a given row-major index
    #[inline(always)]
    pub fn position(&self, index: usize) -> [usize; 2] {
        self.domain().linearized().linear_to_global(index)
    }

    pub fn cell(&self, x: usize, y: usize) -> &Cell {
        &self.cells[self.index(&[x, y])]
    }

    fn cell_mut(&mut self, [x, y]: [usize; 2]) -> &mut Cell {
        let idx = self.index(&[x, y]);
        &mut self.cells[idx]
    }

    pub fn has_wall(&self, x: usize, y: usize, direction: Direction) -> bool {
        self.cell(x, y).walls.contains(direction.wall())
    }

    pub fn wall_exists(&self, wall: &Wall) -> bool {
        self.has_wall(wall.x, wall.y, wall.direction)
    }

    /// Neighboring cell across the wall, if inside the grid
    pub fn neighbor(&self, wall: &Wall) -> Option<[usize; 2]> {
        wall.neighbor().filter(|pos| self.contains(pos))
    }

    /// Check if the wall separates the grid from the outside
    pub fn is_border_wall(&self, wall: &Wall) -> bool {
        self.contains(&wall.position()) && self.neighbor(wall).is_none()
    }

    /// Check if the cell touches the outer border
    pub fn is_border(&self, [x, y]: [usize; 2]) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Remove a wall, on both its sides
    ///
    /// Returns `true` if something changed. Removing an absent wall does nothing,
    /// and border walls are left untouched: only [`Grid::mark_exit`] and
    /// [`Grid::mark_entrance`] can open the border.
    pub fn delete_wall(&mut self, wall: &Wall) -> bool {
        let Some(neighbor) = self.neighbor(wall) else {
            log::trace!("{wall:?}: Refusing to open a border wall");
            return false;
        };
        if !self.wall_exists(wall) {
            debug_assert!(!self.has_wall(neighbor[0], neighbor[1], wall.direction.opposite()));
            return false;
        }
        self.cell_mut(wall.position()).walls -= wall.direction.wall();
        self.cell_mut(neighbor).walls -= wall.direction.opposite().wall();
        true
    }

    /// Open cells reachable in one step from this one
    pub fn open_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = [usize; 2]> + '_ {
        Direction::ALL.into_iter().filter_map(move |d| {
            let wall = Wall::new(x, y, d);
            if self.wall_exists(&wall) {
                None
            } else {
                self.neighbor(&wall)
            }
        })
    }

    /// Walls between two cells of the grid that were removed, each listed once
    pub fn open_internal_walls(&self) -> impl Iterator<Item = Wall> + '_ {
        self.domain().into_iter().flat_map(move |[x, y]| {
            [Direction::East, Direction::South]
                .into_iter()
                .map(move |d| Wall::new(x, y, d))
                .filter(move |w| self.neighbor(w).is_some() && !self.wall_exists(w))
        })
    }

    /// Number of walls between two cells of the grid, each counted once
    pub fn internal_wall_count(&self) -> usize {
        (self.width - 1) * self.height + self.width * (self.height - 1)
    }

    pub fn exit(&self) -> Option<[usize; 2]> {
        self.exit
    }

    pub fn entrance(&self) -> Option<[usize; 2]> {
        self.entrance
    }

    pub fn is_exit_position(&self, x: usize, y: usize) -> bool {
        self.exit == Some([x, y])
    }

    /// Set the exit, opening its outer wall
    pub fn mark_exit(&mut self, x: usize, y: usize) {
        if let Some(old) = self.exit.take() {
            self.unmark(old, Marks::Exit);
        }
        self.mark([x, y], Marks::Exit);
        self.exit = Some([x, y]);
    }

    /// Set the entrance, opening its outer wall
    pub fn mark_entrance(&mut self, x: usize, y: usize) {
        if let Some(old) = self.entrance.take() {
            self.unmark(old, Marks::Entrance);
        }
        self.mark([x, y], Marks::Entrance);
        self.entrance = Some([x, y]);
    }

    /// First side of the cell facing outside
    fn outward(&self, [x, y]: [usize; 2]) -> Direction {
        Direction::ALL
            .into_iter()
            .find(|d| self.is_border_wall(&Wall::new(x, y, *d)))
            .expect("Border cells should have an outward side")
    }

    fn mark(&mut self, pos: [usize; 2], mark: Marks) {
        assert!(
            self.contains(&pos) && self.is_border(pos),
            "{pos:?}: Only border cells can be marked as {mark:?}"
        );
        let outward = self.outward(pos);
        let cell = self.cell_mut(pos);
        cell.marks |= mark;
        cell.walls -= outward.wall();
    }

    fn unmark(&mut self, pos: [usize; 2], mark: Marks) {
        let outward = self.outward(pos);
        let cell = self.cell_mut(pos);
        cell.marks -= mark;
        if cell.marks.is_empty() {
            cell.walls |= outward.wall();
        }
    }

    pub fn is_in_room(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).room.is_some()
    }

    /// Check if a rect, with its one-cell margin, touches any room
    pub fn area_overlaps_with_room(&self, rect: &Rect) -> bool {
        rect.grown(1)
            .intersection(&self.domain())
            .is_some_and(|area| area.into_iter().any(|[x, y]| self.is_in_room(x, y)))
    }

    /// Open up a rectangular room
    ///
    /// All the walls between cells of the rect are removed, and the cells are tagged with `room`.
    /// The rect must lie inside the border and keep clear of other rooms, otherwise
    /// nothing is done and `false` is returned.
    pub fn mark_area_as_room(&mut self, rect: &Rect, room: RoomId) -> bool {
        let Some(inner) = self.domain().inner() else {
            return false;
        };
        if rect.is_empty() || !inner.covers(rect) || self.area_overlaps_with_room(rect) {
            log::debug!("{rect:?}: Room does not fit, skipping");
            return false;
        }
        for [x, y] in *rect {
            self.cell_mut([x, y]).room = Some(room);
            for d in [Direction::East, Direction::South] {
                let wall = Wall::new(x, y, d);
                if wall.neighbor().is_some_and(|n| rect.contains(&n)) {
                    self.delete_wall(&wall);
                }
            }
        }
        true
    }
}
