use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};
use tracing::{debug, warn};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// One second of a running session has passed
    Tick { generation: u64 },
    /// No event arrived within the frame interval
    Frame,
}

/// Source of terminal events (keyboard, resize, ticks)
pub trait AppEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let key_tx = tx.clone();

        std::thread::spawn(move || loop {
            let sent = match event::read() {
                Ok(CtEvent::Key(key)) => key_tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Resize(_, _)) => key_tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    warn!(%err, "terminal event reader stopped");
                    break;
                }
            };
            if sent.is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Sender for other producers (the tick scheduler) sharing this channel
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AppEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: AppEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: AppEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to one frame interval and returns the next event, or Frame on timeout
    pub fn step(&self) -> AppEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Frame,
        }
    }
}

/// Handle to a repeating tick. Cancelling is idempotent and dropping the
/// handle cancels it.
#[derive(Debug)]
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
}

impl TickHandle {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true only for the call that actually cancelled the tick
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Shared flag the tick producer polls before every tick
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }
}

impl Default for TickHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts the repeating one-second tick of a running session
pub trait TickScheduler {
    fn schedule(&mut self, generation: u64) -> TickHandle;
}

/// Sends `AppEvent::Tick` into the event channel from a background thread
pub struct ThreadTickScheduler {
    tx: Sender<AppEvent>,
    interval: Duration,
}

impl ThreadTickScheduler {
    pub fn new(tx: Sender<AppEvent>, interval: Duration) -> Self {
        Self { tx, interval }
    }
}

impl TickScheduler for ThreadTickScheduler {
    fn schedule(&mut self, generation: u64) -> TickHandle {
        let handle = TickHandle::new();
        let cancelled = handle.cancel_flag();
        let tx = self.tx.clone();
        let interval = self.interval;

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            if cancelled.load(Ordering::SeqCst) {
                debug!(generation, "tick stopped");
                break;
            }
            if tx.send(AppEvent::Tick { generation }).is_err() {
                break;
            }
        });

        handle
    }
}

/// Scheduler that never fires on its own; tests deliver ticks by hand
#[derive(Debug, Default)]
pub struct ManualTickScheduler {
    scheduled: Vec<(u64, Arc<AtomicBool>)>,
}

impl ManualTickScheduler {
    /// Number of times a tick was scheduled
    pub fn scheduled(&self) -> usize {
        self.scheduled.len()
    }

    /// Generations whose tick has not been cancelled
    pub fn live_generations(&self) -> Vec<u64> {
        self.scheduled
            .iter()
            .filter(|(_, cancelled)| !cancelled.load(Ordering::SeqCst))
            .map(|(generation, _)| *generation)
            .collect()
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule(&mut self, generation: u64) -> TickHandle {
        let handle = TickHandle::new();
        self.scheduled.push((generation, handle.cancel_flag()));
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::mpsc;

    #[test]
    fn step_returns_frame_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), AppEvent::Frame);
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Tick { generation: 3 }).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        assert_matches!(runner.step(), AppEvent::Tick { generation: 3 });
    }

    #[test]
    fn cancel_is_idempotent() {
        let handle = TickHandle::new();

        assert!(!handle.is_cancelled());
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn drop_cancels_handle() {
        let handle = TickHandle::new();
        let flag = handle.cancel_flag();

        drop(handle);
        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn thread_scheduler_sends_ticks_until_cancelled() {
        let (tx, rx) = mpsc::channel();
        let mut scheduler = ThreadTickScheduler::new(tx, Duration::from_millis(5));

        let handle = scheduler.schedule(7);
        assert_matches!(
            rx.recv_timeout(Duration::from_secs(2)),
            Ok(AppEvent::Tick { generation: 7 })
        );

        handle.cancel();
        // drain anything sent before the cancel was observed
        std::thread::sleep(Duration::from_millis(30));
        while rx.try_recv().is_ok() {}

        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn manual_scheduler_tracks_live_ticks() {
        let mut scheduler = ManualTickScheduler::default();

        let first = scheduler.schedule(1);
        let _second = scheduler.schedule(2);
        assert_eq!(scheduler.live_generations(), vec![1, 2]);

        first.cancel();
        assert_eq!(scheduler.live_generations(), vec![2]);
        assert_eq!(scheduler.scheduled(), 2);
    }
}
