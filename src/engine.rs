use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use thiserror::Error;
use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::command::Command;
use crate::grid::BoundsError;
use crate::grid::Grid;
use crate::pattern::Pattern;
use crate::render::Renderer;
use crate::rule_set::RuleSet;

/// Commands submitted while running queue up here; a full queue blocks the
/// submitter until the stepping thread drains.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Lifecycle of an [`Engine`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum State {
    Paused = 0,
    Running = 1,
    Stopped = 2,
}

impl State {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => State::Paused,
            1 => State::Running,
            _ => State::Stopped,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Engine is stopped")]
    Stopped,

    #[error("Invalid transition, engine is {0:?}")]
    InvalidState(State),

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}

/// The published simulation state, shared between the foreground and the
/// stepping thread. The stepping thread is its only writer while running; it
/// holds the lock just long enough to read a source generation or to swap in
/// a finished one.
struct Core {
    grid: Grid,
    renderer: Option<Box<dyn Renderer + Send>>,
}

impl Core {
    /// Push the full grid to the renderer, if one is attached. Render
    /// failures are never fatal to the simulation.
    fn redraw(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        for ((x, y), alive) in self.grid.enumerate() {
            renderer.draw_cell(x, y, alive);
        }

        if let Err(err) = renderer.present() {
            warn!("Renderer failed to present: {err}");
        }
    }
}

struct Shared {
    state: AtomicU8,
    core: Mutex<Core>,

    /// Handle of the stepping thread, if one was ever spawned. Joined before
    /// a new worker starts, before a paused submit mutates the grid, and on
    /// stop.
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Shared {
    fn state(&self) -> State {
        State::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: State) {
        self.state.store(state as u8, Ordering::Release);
    }

    fn lock_core(&self) -> MutexGuard<'_, Core> {
        // A panicking worker never leaves the grid half-written: it only
        // holds the lock around a completed swap
        match self.core.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Wait for the stepping thread to exit. It checks the state flag at the
    /// top of every iteration, so this returns within one generation.
    fn join_worker(&self) {
        let handle = match self.worker.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

/// A Life-family simulation with a background stepping thread.
///
/// The engine starts `Paused`. While `Running`, a single worker thread
/// advances one generation per `delay`, draining at most one queued
/// [`Command`] per generation so every boundary sees external mutations in
/// submission order, exactly once, never mid-computation.
pub struct Engine {
    shared: Arc<Shared>,
    cmd_tx: Sender<Command>,
    cmd_rx: Receiver<Command>,
    rules: RuleSet,
    delay: Duration,
}

impl Engine {
    /// Create a paused engine over an all-dead grid.
    pub fn new(width: usize, height: usize, rules: RuleSet, delay: Duration) -> Self {
        Self::with_queue_capacity(width, height, rules, delay, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_queue_capacity(
        width: usize,
        height: usize,
        rules: RuleSet,
        delay: Duration,
        capacity: usize,
    ) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(capacity);

        let shared = Arc::new(Shared {
            state: AtomicU8::new(State::Paused as u8),
            core: Mutex::new(Core {
                grid: Grid::new(width, height),
                renderer: None,
            }),
            worker: Mutex::new(None),
        });

        Self {
            shared,
            cmd_tx,
            cmd_rx,
            rules,
            delay,
        }
    }

    /// Attach the display boundary. The renderer is notified once per
    /// published generation and once per synchronously applied command.
    pub fn set_renderer(&mut self, renderer: Box<dyn Renderer + Send>) {
        let mut core = self.shared.lock_core();
        core.renderer = Some(renderer);
        core.redraw();
    }

    pub fn state(&self) -> State {
        self.shared.state()
    }

    /// Snapshot of the most recently published generation.
    pub fn current_grid(&self) -> Grid {
        self.shared.lock_core().grid.clone()
    }

    /// Submit a deferred mutation.
    ///
    /// While `Paused` the command is applied to the current grid before this
    /// returns, and its `BoundsError` (if any) propagates to the caller.
    /// While `Running` it is queued for the stepping thread; a full queue
    /// blocks until space frees up rather than dropping the command.
    pub fn submit(&self, command: Command) -> Result<(), EngineError> {
        match self.state() {
            State::Stopped => Err(EngineError::Stopped),
            State::Paused => {
                // A worker winding down after pause() may still publish one
                // final generation. Wait it out so the synchronous mutation
                // cannot be overwritten.
                self.shared.join_worker();

                let mut core = self.shared.lock_core();
                command.apply(&mut core.grid)?;
                core.redraw();

                Ok(())
            }
            State::Running => {
                // Blocking backpressure: every command is a user-visible
                // intent and must not be lost
                self.cmd_tx
                    .send(command)
                    .map_err(|_| EngineError::Stopped)?;

                Ok(())
            }
        }
    }

    pub fn toggle_cell(&self, x: usize, y: usize) -> Result<(), EngineError> {
        self.submit(Command::toggle(x, y))
    }

    pub fn stamp_pattern(&self, pattern: Pattern, x: usize, y: usize) -> Result<(), EngineError> {
        self.submit(Command::stamp(pattern, x, y))
    }

    /// Signal the stepping thread to exit at its next iteration boundary. Any
    /// generation in progress is finished and published; this call does not
    /// wait for that.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        match self.state() {
            State::Stopped => Err(EngineError::Stopped),
            State::Paused => Err(EngineError::InvalidState(State::Paused)),
            State::Running => {
                debug!("Pausing");
                self.shared.set_state(State::Paused);

                Ok(())
            }
        }
    }

    /// Start the stepping thread. Requires `Paused`.
    pub fn resume(&mut self) -> Result<(), EngineError> {
        match self.state() {
            State::Stopped => Err(EngineError::Stopped),
            State::Running => Err(EngineError::InvalidState(State::Running)),
            State::Paused => {
                // At most one stepping thread ever exists
                self.shared.join_worker();

                debug!("Resuming");
                self.shared.set_state(State::Running);

                let shared = Arc::clone(&self.shared);
                let cmd_rx = self.cmd_rx.clone();
                let rules = self.rules;
                let delay = self.delay;

                let handle = thread::spawn(move || run_worker(shared, cmd_rx, rules, delay));

                match self.shared.worker.lock() {
                    Ok(mut slot) => *slot = Some(handle),
                    Err(poisoned) => *poisoned.into_inner() = Some(handle),
                }

                Ok(())
            }
        }
    }

    /// Tear the engine down. The stepping thread has fully exited when this
    /// returns. Idempotent.
    pub fn stop(&mut self) {
        if self.state() == State::Stopped {
            return;
        }

        debug!("Stopping");
        self.shared.set_state(State::Stopped);
        self.shared.join_worker();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The background stepping loop.
///
/// Per iteration: bail unless still running, compute the next generation from
/// the published grid, layer at most one queued command on top, publish by
/// swapping the new grid in, notify the renderer, sleep. Commands are never
/// applied mid-computation, so generation N+1 is always a pure function of
/// generation N plus at most one mutation.
fn run_worker(shared: Arc<Shared>, cmd_rx: Receiver<Command>, rules: RuleSet, delay: Duration) {
    let mut generation: u64 = 0;

    loop {
        if shared.state() != State::Running {
            debug!(generation, "Stepping thread exiting");
            break;
        }

        let mut next = {
            let core = shared.lock_core();
            core.grid.step(&rules)
        };

        if let Ok(command) = cmd_rx.try_recv() {
            if let Err(err) = command.apply(&mut next) {
                warn!("Discarding command \"{command}\": {err}");
            }
        }

        {
            let mut core = shared.lock_core();
            core.grid = next;
            core.redraw();
        }

        generation += 1;
        trace!(generation, "Published");

        thread::sleep(delay);
    }
}
