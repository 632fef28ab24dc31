//! What the factory is asked to build, and what it hands back

use std::{
    any::Any,
    fmt::Debug,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, OnceLock,
    },
};

use crate::{Builder, DistanceField, Grid};

/// A request for a maze
///
/// Callbacks are invoked from the factory worker thread. They may query or cancel the factory,
/// but waiting on it from a callback never returns.
pub trait Order: Send + Sync + 'static {
    /// Required skill level, in `0..=15`
    fn skill_level(&self) -> u8;
    /// Algorithm building the spanning tree
    fn builder(&self) -> Builder;
    /// A perfect maze has no loops and no rooms
    fn is_perfect(&self) -> bool;
    /// Receive the finished maze. Called at most once per order.
    fn deliver(&self, configuration: MazeConfiguration);
    /// Percentage of completion, never decreasing, ending with 100 right before delivery
    fn update_progress(&self, percentage: u8);
}

/// Opaque data attached to a maze by the renderer
pub type RenderHandle = Arc<dyn Any + Send + Sync>;

/// A finished maze
#[derive(Clone)]
pub struct MazeConfiguration {
    grid: Grid,
    distances: DistanceField,
    start: [usize; 2],
    render_handle: Option<RenderHandle>,
}

impl MazeConfiguration {
    pub fn new(grid: Grid, distances: DistanceField) -> Self {
        debug_assert_eq!(grid.exit(), Some(distances.exit_position()));
        Self {
            start: distances.start_position(),
            grid,
            distances,
            render_handle: None,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn distances(&self) -> &DistanceField {
        &self.distances
    }

    pub fn start_position(&self) -> [usize; 2] {
        self.start
    }

    /// Override the starting point chosen by the factory
    pub fn set_start_position(&mut self, x: usize, y: usize) {
        assert!(
            self.grid.contains(&[x, y]),
            "{:?}: Start outside of the maze",
            [x, y]
        );
        self.start = [x, y];
    }

    pub fn exit_position(&self) -> [usize; 2] {
        self.distances.exit_position()
    }

    pub fn distance_to_exit(&self, x: usize, y: usize) -> u32 {
        self.distances.distance(x, y)
    }

    pub fn neighbor_closer_to_exit(&self, x: usize, y: usize) -> Option<[usize; 2]> {
        self.distances.neighbor_closer_to_exit(&self.grid, x, y)
    }

    /// Cells that cannot reach the exit
    ///
    /// Bounded by the room budget of the skill level, and zero for perfect mazes.
    pub fn isolated_cells(&self) -> usize {
        self.distances.unreachable_count()
    }

    pub fn render_handle(&self) -> Option<&RenderHandle> {
        self.render_handle.as_ref()
    }

    pub fn set_render_handle(&mut self, handle: RenderHandle) {
        self.render_handle = Some(handle);
    }
}

impl Debug for MazeConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MazeConfiguration")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("start", &self.start)
            .field("exit", &self.exit_position())
            .field("render_handle", &self.render_handle.is_some())
            .finish_non_exhaustive()
    }
}

/// An order that keeps what it receives
#[derive(Debug)]
pub struct BasicOrder {
    skill: u8,
    perfect: bool,
    builder: Builder,
    configuration: OnceLock<MazeConfiguration>,
    progress: AtomicU8,
}

impl BasicOrder {
    pub fn new(skill: u8, perfect: bool, builder: Builder) -> Self {
        Self {
            skill,
            perfect,
            builder,
            configuration: OnceLock::new(),
            progress: AtomicU8::new(0),
        }
    }

    /// The delivered maze, if any
    pub fn configuration(&self) -> Option<&MazeConfiguration> {
        self.configuration.get()
    }

    /// Last reported percentage
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }
}

impl Order for BasicOrder {
    fn skill_level(&self) -> u8 {
        self.skill
    }

    fn builder(&self) -> Builder {
        self.builder
    }

    fn is_perfect(&self) -> bool {
        self.perfect
    }

    fn deliver(&self, configuration: MazeConfiguration) {
        if self.configuration.set(configuration).is_err() {
            log::warn!("Order already delivered, ignoring the new maze");
        }
    }

    fn update_progress(&self, percentage: u8) {
        self.progress.fetch_max(percentage, Ordering::AcqRel);
    }
}
