use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc, Mutex, OnceLock, Weak,
    },
    thread,
    time::Duration,
};

use mazegen::{
    BasicOrder, BuildState, Builder, Factory, FactoryError, MazeConfiguration, Order, Skill,
};

/// Order recording every progress report it gets
#[derive(Debug)]
struct Recording {
    inner: BasicOrder,
    history: Mutex<Vec<u8>>,
    progress_at_delivery: Mutex<Option<u8>>,
}

impl Recording {
    fn new(skill: u8, perfect: bool, builder: Builder) -> Self {
        Self {
            inner: BasicOrder::new(skill, perfect, builder),
            history: Mutex::default(),
            progress_at_delivery: Mutex::default(),
        }
    }
}

impl Order for Recording {
    fn skill_level(&self) -> u8 {
        self.inner.skill_level()
    }
    fn builder(&self) -> Builder {
        self.inner.builder()
    }
    fn is_perfect(&self) -> bool {
        self.inner.is_perfect()
    }
    fn deliver(&self, configuration: MazeConfiguration) {
        *self.progress_at_delivery.lock().unwrap() = self.history.lock().unwrap().last().copied();
        self.inner.deliver(configuration)
    }
    fn update_progress(&self, percentage: u8) {
        self.history.lock().unwrap().push(percentage);
        self.inner.update_progress(percentage)
    }
}

/// Order that holds the worker on its first progress report, until released
struct Gated {
    inner: BasicOrder,
    stopped: AtomicBool,
    reached: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl Gated {
    fn new(skill: u8) -> (Arc<Self>, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (reached_tx, reached_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let order = Arc::new(Self {
            inner: BasicOrder::new(skill, false, Builder::Kruskal),
            stopped: AtomicBool::new(false),
            reached: Mutex::new(reached_tx),
            release: Mutex::new(release_rx),
        });
        (order, reached_rx, release_tx)
    }
}

impl Order for Gated {
    fn skill_level(&self) -> u8 {
        self.inner.skill_level()
    }
    fn builder(&self) -> Builder {
        self.inner.builder()
    }
    fn is_perfect(&self) -> bool {
        self.inner.is_perfect()
    }
    fn deliver(&self, configuration: MazeConfiguration) {
        self.inner.deliver(configuration)
    }
    fn update_progress(&self, percentage: u8) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            self.reached.lock().unwrap().send(()).unwrap();
            let _ = self.release.lock().unwrap().recv();
        }
        self.inner.update_progress(percentage)
    }
}

/// Order looking at its factory from inside the callbacks
struct Curious {
    inner: BasicOrder,
    factory: OnceLock<Weak<Factory>>,
    /// State seen and result of `cancel` at each look
    looks: Mutex<Vec<(u8, BuildState, bool)>>,
}

impl Curious {
    fn look(&self, percentage: u8) {
        if let Some(factory) = self.factory.get().and_then(Weak::upgrade) {
            let state = factory.state();
            let cancelled = factory.cancel();
            self.looks.lock().unwrap().push((percentage, state, cancelled));
        }
    }
}

impl Order for Curious {
    fn skill_level(&self) -> u8 {
        self.inner.skill_level()
    }
    fn builder(&self) -> Builder {
        self.inner.builder()
    }
    fn is_perfect(&self) -> bool {
        self.inner.is_perfect()
    }
    fn deliver(&self, configuration: MazeConfiguration) {
        // 101 stands for the delivery itself
        self.look(101);
        self.inner.deliver(configuration)
    }
    fn update_progress(&self, percentage: u8) {
        if percentage == 100 {
            self.look(percentage);
        }
        self.inner.update_progress(percentage)
    }
}

/// Order whose delivery blows up
struct Exploding;

impl Order for Exploding {
    fn skill_level(&self) -> u8 {
        0
    }
    fn builder(&self) -> Builder {
        Builder::Prim
    }
    fn is_perfect(&self) -> bool {
        true
    }
    fn deliver(&self, _: MazeConfiguration) {
        panic!("renderer exploded")
    }
    fn update_progress(&self, _: u8) {}
}

#[test]
fn progress_is_monotonic_and_ends_at_100() {
    let factory = Factory::deterministic();
    for perfect in [true, false] {
        let order = Arc::new(Recording::new(3, perfect, Builder::DepthFirst));
        factory.order(order.clone()).unwrap();
        assert_eq!(factory.wait_till_delivered(), BuildState::Delivered);

        let history = order.history.lock().unwrap().clone();
        assert!(!history.is_empty());
        assert!(history.windows(2).all(|w| w[0] <= w[1]), "{history:?}");
        assert_eq!(history.last(), Some(&100));
        assert_eq!(*order.progress_at_delivery.lock().unwrap(), Some(100));
        assert!(order.inner.configuration().is_some());
    }
}

#[test]
fn unsupported_algorithms_are_refused() {
    let factory = Factory::deterministic();
    let order = Arc::new(BasicOrder::new(1, true, Builder::Eller));
    assert_eq!(
        factory.order(order.clone()),
        Err(FactoryError::Unsupported(Builder::Eller))
    );
    assert_eq!(factory.state(), BuildState::Idle);
    assert!(order.configuration().is_none());
}

#[test]
fn nothing_to_cancel() {
    let factory = Factory::deterministic();
    assert!(!factory.cancel());

    let order = Arc::new(BasicOrder::new(0, true, Builder::Prim));
    factory.order(order.clone()).unwrap();
    assert_eq!(factory.wait_till_delivered(), BuildState::Delivered);
    assert!(!factory.cancel());
    assert_eq!(factory.state(), BuildState::Delivered);
    assert!(order.configuration().is_some());
}

#[test]
fn one_order_at_a_time_and_cancel_before_delivery() {
    let factory = Factory::deterministic();
    let (order, reached, release) = Gated::new(2);
    factory.order(order.clone()).unwrap();
    reached.recv().unwrap();

    assert_eq!(factory.state(), BuildState::Building);
    let second = Arc::new(BasicOrder::new(0, true, Builder::Prim));
    assert_eq!(factory.order(second.clone()), Err(FactoryError::Busy));

    assert!(factory.cancel());
    assert!(!factory.cancel());
    release.send(()).unwrap();
    assert_eq!(factory.wait_till_delivered(), BuildState::Cancelled);
    assert!(order.inner.configuration().is_none());

    // the factory is usable again
    factory.order(second.clone()).unwrap();
    assert_eq!(factory.wait_till_delivered(), BuildState::Delivered);
    assert!(second.configuration().is_some());
    assert!(order.inner.configuration().is_none());
}

#[tokio::test]
async fn cancelled_orders_are_never_delivered() {
    let factory = Factory::deterministic();
    let (order, reached, release) = Gated::new(1);
    factory.order(order.clone()).unwrap();
    reached.recv().unwrap();
    assert!(factory.cancel());
    release.send(()).unwrap();
    assert_eq!(factory.delivered().await, BuildState::Cancelled);
    // dropping joins the worker
    drop(factory);
    assert!(order.inner.configuration().is_none());
    assert!(order.inner.progress() < 100);
}

#[test]
fn callbacks_can_query_the_factory() {
    let factory = Arc::new(Factory::deterministic());
    let order = Arc::new(Curious {
        inner: BasicOrder::new(1, false, Builder::Kruskal),
        factory: OnceLock::new(),
        looks: Mutex::default(),
    });
    order.factory.set(Arc::downgrade(&factory)).unwrap();
    factory.order(order.clone()).unwrap();

    let (done_tx, done_rx) = mpsc::channel();
    let waiter = {
        let factory = factory.clone();
        thread::spawn(move || done_tx.send(factory.wait_till_delivered()).unwrap())
    };
    let state = done_rx
        .recv_timeout(Duration::from_secs(30))
        .expect("The factory should deliver while its callbacks look at it");
    waiter.join().unwrap();

    assert_eq!(state, BuildState::Delivered);
    assert!(order.inner.configuration().is_some());
    // once committed, delivery cannot be cancelled
    assert_eq!(
        *order.looks.lock().unwrap(),
        vec![
            (100, BuildState::Delivering, false),
            (101, BuildState::Delivering, false)
        ]
    );
    assert_eq!(factory.state(), BuildState::Delivered);
}

#[test]
fn mazes_match_the_skill_table() {
    let factory = Factory::deterministic();
    for level in [0, 1, 5] {
        let order = Arc::new(BasicOrder::new(level, false, Builder::Prim));
        factory.order(order.clone()).unwrap();
        factory.wait_till_delivered();
        let maze = order.configuration().unwrap();
        let skill = Skill::level(level);
        assert_eq!(maze.width(), skill.width);
        assert_eq!(maze.height(), skill.height);
        assert!(maze.isolated_cells() <= skill.rooms);
    }
}

#[test]
#[should_panic(expected = "renderer exploded")]
fn worker_panics_reach_the_waiter() {
    let factory = Factory::deterministic();
    factory.order(Arc::new(Exploding)).unwrap();
    factory.wait_till_delivered();
}
