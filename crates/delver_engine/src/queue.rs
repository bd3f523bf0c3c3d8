//! The operations queue.
//!
//! Monster actions and scripted sequences are queued as operations and run
//! strictly in order. Between operations the queue waits through a
//! [`Pacer`], flushes narration, and stops when a full page has been shown
//! or a [`Operation::Pause`] is reached. When it runs dry it fires its
//! drained callback, which moves the turn on.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tracing::{debug, trace};

/// A deferred piece of work for host `H`.
pub type Call<H> = Box<dyn FnOnce(&mut H)>;

/// One queued step.
pub enum Operation<H> {
    /// Runs against the host, then flushes output.
    Call(Call<H>),
    /// Waits before the next step.
    Delay(Duration),
    /// Stops until [`OperationsQueue::resume`].
    Pause,
}

impl<H> fmt::Debug for Operation<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call(_) => f.write_str("Call"),
            Self::Delay(d) => write!(f, "Delay({d:?})"),
            Self::Pause => f.write_str("Pause"),
        }
    }
}

/// Waits between operations.
pub trait Pacer {
    /// Blocks for the given duration, or pretends to.
    fn wait(&mut self, duration: Duration);
}

/// Sleeps the thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepPacer;

impl Pacer for SleepPacer {
    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Never waits. Tests and fast play use this.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn wait(&mut self, _duration: Duration) {}
}

/// What the queue needs from the context it runs against.
pub trait QueueHost: Sized {
    /// The queue owned by the host.
    fn operations(&mut self) -> &mut OperationsQueue<Self>;

    /// Shows buffered output. Returns true if a full page asks for a pause.
    fn flush_output(&mut self) -> bool;
}

/// Ordered, paced work.
pub struct OperationsQueue<H> {
    operations: VecDeque<Operation<H>>,
    on_drained: Option<Call<H>>,
    paused: bool,
    delay_time: Duration,
    pacer: Box<dyn Pacer>,
}

impl<H> fmt::Debug for OperationsQueue<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationsQueue")
            .field("operations", &self.operations)
            .field("paused", &self.paused)
            .field("delay_time", &self.delay_time)
            .finish_non_exhaustive()
    }
}

impl<H> Default for OperationsQueue<H> {
    fn default() -> Self {
        Self::new(Duration::from_millis(100), Box::new(SleepPacer))
    }
}

impl<H> OperationsQueue<H> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new(delay_time: Duration, pacer: Box<dyn Pacer>) -> Self {
        Self {
            operations: VecDeque::new(),
            on_drained: None,
            paused: false,
            delay_time,
            pacer,
        }
    }

    /// Appends an operation.
    pub fn push(&mut self, operation: Operation<H>) {
        self.operations.push_back(operation);
    }

    /// Appends a call.
    pub fn push_call(&mut self, call: impl FnOnce(&mut H) + 'static) {
        self.push(Operation::Call(Box::new(call)));
    }

    /// Appends a delay.
    pub fn delay(&mut self, duration: Duration) {
        self.push(Operation::Delay(duration));
    }

    /// Appends a pause.
    pub fn pause(&mut self) {
        self.push(Operation::Pause);
    }

    /// Sets what runs once the queue is empty. Replaces any earlier callback.
    pub fn on_drained(&mut self, call: impl FnOnce(&mut H) + 'static) {
        self.on_drained = Some(Box::new(call));
    }

    /// Waiting for [`OperationsQueue::resume`].
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Current pause between operations.
    #[must_use]
    pub const fn delay_time(&self) -> Duration {
        self.delay_time
    }

    /// Shortens the pause between operations, down to zero.
    pub fn faster(&mut self, amount: Duration) {
        self.delay_time = self.delay_time.saturating_sub(amount);
    }

    /// Lengthens the pause between operations.
    pub fn slower(&mut self, amount: Duration) {
        self.delay_time = self.delay_time.saturating_add(amount);
    }

    /// Replaces the pacer.
    pub fn set_pacer(&mut self, pacer: Box<dyn Pacer>) {
        self.pacer = pacer;
    }

    /// Drops queued operations and the drained callback.
    pub fn clear(&mut self) {
        self.operations.clear();
        self.on_drained = None;
        self.paused = false;
    }
}

impl<H: QueueHost> OperationsQueue<H> {
    /// Runs queued operations until the queue empties or pauses.
    pub fn run(host: &mut H) {
        host.operations().paused = false;
        loop {
            let Some(operation) = host.operations().operations.pop_front() else {
                if let Some(done) = host.operations().on_drained.take() {
                    debug!("operations drained");
                    done(host);
                }
                return;
            };
            trace!(?operation, "running operation");
            match operation {
                Operation::Call(call) => {
                    call(host);
                    if host.flush_output() {
                        debug!("page full, pausing operations");
                        host.operations().paused = true;
                        return;
                    }
                }
                Operation::Delay(duration) => {
                    host.operations().pacer.wait(duration);
                    continue;
                }
                Operation::Pause => {
                    debug!("operations paused");
                    host.operations().paused = true;
                    return;
                }
            }
            let queue = host.operations();
            if !queue.operations.is_empty() {
                let delay = queue.delay_time;
                queue.pacer.wait(delay);
            }
        }
    }

    /// Continues after a pause.
    pub fn resume(host: &mut H) {
        debug!("operations resumed");
        Self::run(host);
    }
}
