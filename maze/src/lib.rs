//! Procedural generation of grid mazes, with the distances needed to play them

mod rects;
pub use rects::{Cells, Linearized, Rect};

mod walls;
pub use walls::{Direction, Wall, Walls};

pub mod grid;
pub use grid::{Cell, Grid, Marks, RoomId};

pub mod builders;
pub use builders::{verify_spanning_tree, Builder, TreeError};

pub mod config;
pub use config::{Config, PartialConfig, Skill};

pub mod distance;
pub use distance::DistanceField;

mod factory;
pub use factory::{BuildState, Factory, FactoryError};

pub mod order;
pub use order::{BasicOrder, MazeConfiguration, Order, RenderHandle};

pub mod progress;
pub mod rooms;
