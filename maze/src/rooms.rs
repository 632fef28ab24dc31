//! Rooms: open rectangular areas carved into a finished spanning tree
//!
//! Rooms add loops to the maze, so they are only carved when an imperfect maze is requested.

use rand::Rng;

use crate::{grid::RoomId, progress::Progress, Config, Grid, Rect};

/// Carve up to `budget` rooms into the grid, returning how many were placed
///
/// Rooms are placed at random, so on small grids some attempts will fail.
/// After `config.room_tries` failures the carver gives up.
pub fn carve_rooms<R>(
    grid: &mut Grid,
    budget: usize,
    config: &Config,
    rng: &mut R,
    progress: &mut Progress,
) -> usize
where
    R: Rng + ?Sized,
{
    let mut placed = 0;
    let mut tries = 0;
    while placed < budget && tries < config.room_tries {
        match place_room(grid, config, rng, placed) {
            Some(rect) => {
                log::trace!("{rect:?}: Carved room {placed}");
                placed += 1;
                progress.report(placed, budget);
            }
            None => tries += 1,
        }
    }
    log::debug!(
        "{}x{}: Carved {placed} rooms out of {budget}, {tries} failed attempts",
        grid.width(),
        grid.height()
    );
    placed
}

/// Try to place a single room of random shape and position
fn place_room<R>(grid: &mut Grid, config: &Config, rng: &mut R, placed: usize) -> Option<Rect>
where
    R: Rng + ?Sized,
{
    let min = config.min_room_size.max(1);
    let max = config.max_room_size.max(min);
    // rooms must stay well clear of the border
    let width = rng.gen_range(min..=max);
    if width + 4 >= grid.width() {
        return None;
    }
    let height = rng.gen_range(min..=max);
    if height + 4 >= grid.height() {
        return None;
    }
    let minx = rng.gen_range(1..grid.width() - width);
    let miny = rng.gen_range(1..grid.height() - height);
    let rect = Rect {
        minx,
        miny,
        maxx: minx + width,
        maxy: miny + height,
    };
    let id = RoomId::try_from(placed + 1).ok()?;
    grid.mark_area_as_room(&rect, id).then_some(rect)
}
