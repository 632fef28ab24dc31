//! Background maze production
//!
//! A [`Factory`] takes one [`Order`] at a time and builds it on a dedicated worker thread:
//! spanning tree, then rooms, then distances. The build state lives in a single watch channel,
//! shared by the caller and the worker. Delivery and cancellation both go through it, so
//! exactly one of them can win. The order callbacks always run with the channel unlocked.

use std::{
    io,
    panic::resume_unwind,
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

use rand::{Rng, SeedableRng};
use rand_wyrand::WyRand;
use tokio::sync::watch;

use crate::{
    distance::place_exit, progress::Progress, rooms::carve_rooms, Builder, Config, Grid,
    MazeConfiguration, Order, Skill,
};

/// Progress slice of the spanning tree
const TREE_PHASE: std::ops::RangeInclusive<u8> = 0..=70;
/// Progress slice of the room carver
const ROOMS_PHASE: std::ops::RangeInclusive<u8> = 70..=80;
/// Progress slice of the distance field
const DISTANCE_PHASE: std::ops::RangeInclusive<u8> = 80..=95;

/// State of the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    /// Nothing was ever ordered
    Idle,
    Building,
    /// The maze is complete and being handed to the order, cancelling is no longer possible
    Delivering,
    Delivered,
    Cancelled,
    /// The worker panicked
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
    #[error("a maze is already being built")]
    Busy,
    #[error("the {0} algorithm is not implemented")]
    Unsupported(Builder),
    #[error("cannot start the worker thread: {0:?}")]
    Spawn(io::ErrorKind),
}

impl BuildState {
    /// A worker is busy with an order
    pub fn is_running(self) -> bool {
        matches!(self, BuildState::Building | BuildState::Delivering)
    }
}

/// Builds mazes in the background, one at a time
#[derive(Debug)]
pub struct Factory {
    config: Config,
    state: Arc<watch::Sender<BuildState>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Factory {
    pub fn new(config: Config) -> Self {
        let (state, _) = watch::channel(BuildState::Idle);
        Self {
            config,
            state: Arc::new(state),
            worker: Mutex::new(None),
        }
    }

    /// Factory producing the same maze every time the same order is placed
    pub fn deterministic() -> Self {
        Self::new(Config::deterministic())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> BuildState {
        *self.state.borrow()
    }

    /// Start building a maze
    ///
    /// Fails if a build is already running, or if the requested algorithm does not exist.
    pub fn order<O: Order>(&self, order: Arc<O>) -> Result<(), FactoryError> {
        let builder = order.builder();
        if !builder.is_implemented() {
            return Err(FactoryError::Unsupported(builder));
        }

        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if self.state().is_running() {
            return Err(FactoryError::Busy);
        }
        // a cancelled worker could still be finishing its current phase
        if let Some(previous) = worker.take() {
            if let Err(payload) = previous.join() {
                log::error!("Previous build panicked");
                resume_unwind(payload)
            }
        }

        self.state.send_replace(BuildState::Building);
        let state = self.state.clone();
        let config = self.config;
        match thread::Builder::new()
            .name("maze-factory".to_owned())
            .spawn(move || build(&*order, config, &state))
        {
            Ok(handle) => {
                *worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.state.send_replace(BuildState::Idle);
                Err(FactoryError::Spawn(err.kind()))
            }
        }
    }

    /// Stop the running build, if any
    ///
    /// Returns `false` if there was nothing to cancel, e.g. because the maze was already delivered.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.send_if_modified(|state| {
            if *state == BuildState::Building {
                *state = BuildState::Cancelled;
                true
            } else {
                false
            }
        });
        if cancelled {
            log::info!("Build cancelled");
        }
        cancelled
    }

    /// Wait for the running build to end, returning how it ended
    ///
    /// If the worker panicked, the panic is resumed here.
    pub async fn delivered(&self) -> BuildState {
        let mut receiver = self.state.subscribe();
        let state = match receiver.wait_for(|s| !s.is_running()).await {
            Ok(state) => *state,
            // the sender lives as long as `self`
            Err(_) => self.state(),
        };
        if state == BuildState::Failed {
            self.propagate_failure();
        }
        state
    }

    /// Blocking version of [`Factory::delivered`]
    pub fn wait_till_delivered(&self) -> BuildState {
        futures::executor::block_on(self.delivered())
    }

    fn propagate_failure(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Err(payload)) = handle.map(JoinHandle::join) {
            resume_unwind(payload)
        }
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Factory {
    fn drop(&mut self) {
        self.cancel();
        let handle = self
            .worker
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(Err(_)) = handle.map(JoinHandle::join) {
            log::error!("Maze worker panicked");
        }
    }
}

/// Marks the build as failed if the worker unwinds
struct FailureGuard<'a>(&'a watch::Sender<BuildState>);

impl Drop for FailureGuard<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.send_if_modified(|state| {
                if state.is_running() {
                    *state = BuildState::Failed;
                    true
                } else {
                    false
                }
            });
        }
    }
}

/// Body of the worker thread
fn build<O: Order + ?Sized>(order: &O, config: Config, state: &watch::Sender<BuildState>) {
    let _guard = FailureGuard(state);
    let cancelled = || *state.borrow() != BuildState::Building;

    let skill = Skill::level(order.skill_level());
    let builder = order.builder();
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    log::info!(
        "{}x{}: Building a {} maze with {builder}, seed {seed}",
        skill.width,
        skill.height,
        if order.is_perfect() {
            "perfect"
        } else {
            "imperfect"
        }
    );
    let mut rng = WyRand::seed_from_u64(seed);
    let sink = |percentage: u8| {
        if !cancelled() {
            order.update_progress(percentage)
        }
    };
    let mut progress = Progress::new(&sink);

    let mut grid = Grid::new(skill.width, skill.height);
    progress.phase(TREE_PHASE);
    if let Err(err) = builder.build(&mut grid, &mut rng, &mut progress) {
        log::error!("Cannot build the maze: {err}");
        state.send_if_modified(|state| {
            let building = *state == BuildState::Building;
            if building {
                *state = BuildState::Failed;
            }
            building
        });
        return;
    }
    progress.finish_phase();
    if cancelled() {
        log::debug!("Cancelled after the spanning tree");
        return;
    }

    if !order.is_perfect() {
        progress.phase(ROOMS_PHASE);
        carve_rooms(&mut grid, skill.rooms, &config, &mut rng, &mut progress);
        progress.finish_phase();
        if cancelled() {
            log::debug!("Cancelled after the rooms");
            return;
        }
    }

    progress.phase(DISTANCE_PHASE);
    let distances = place_exit(&mut grid, &mut rng, &mut progress);
    progress.finish_phase();
    let configuration = MazeConfiguration::new(grid, distances);

    let committed = state.send_if_modified(|state| {
        if *state != BuildState::Building {
            return false;
        }
        *state = BuildState::Delivering;
        true
    });
    if !committed {
        log::debug!("Cancelled before delivery");
        return;
    }
    order.update_progress(100);
    order.deliver(configuration);
    state.send_replace(BuildState::Delivered);
    log::info!("{}x{}: Maze delivered", skill.width, skill.height);
}
