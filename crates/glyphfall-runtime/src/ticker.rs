#![forbid(unsafe_code)]

//! Threaded frame clock.
//!
//! [`FrameTicker`] runs one background thread that sends a [`Tick`] over an
//! `mpsc` channel at a fixed interval. The thread never touches effect
//! state; the receiving thread owns the [`Stage`](crate::Stage) and feeds it
//! each tick's `elapsed`, which keeps all mutation on one logical worker.
//!
//! # Invariants
//!
//! 1. Ticks arrive in send order with strictly increasing `seq`.
//! 2. After [`FrameTicker::stop`] returns, the thread has exited and no
//!    further tick is sent.

use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

use web_time::Instant;

/// Default frame interval (about 60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// One frame-clock event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Sequence number, starting at 1.
    pub seq: u64,
    /// Time since the previous tick (or since spawn, for the first).
    pub elapsed: Duration,
}

/// Stop flag shared with the ticker thread.
#[derive(Clone)]
pub(crate) struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    /// Whether stop has been requested.
    pub(crate) fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration` unless stopped first.
    ///
    /// Returns `true` if stopped, `false` on timeout.
    pub(crate) fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        loop {
            if *stopped {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(stopped, duration - elapsed)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = guard;
        }
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

/// Background frame clock delivering [`Tick`]s over a channel.
pub struct FrameTicker {
    interval: Duration,
    trigger: StopTrigger,
    receiver: mpsc::Receiver<Tick>,
    thread: Option<thread::JoinHandle<u64>>,
}

impl FrameTicker {
    /// Start ticking every `interval`.
    ///
    /// # Errors
    ///
    /// Propagates the OS error if the thread cannot be spawned.
    pub fn spawn(interval: Duration) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let thread = thread::Builder::new()
            .name("glyphfall-ticker".into())
            .spawn(move || run(interval, &sender, &signal))?;
        tracing::debug!(interval_ms = interval.as_millis() as u64, "frame ticker started");
        Ok(Self {
            interval,
            trigger,
            receiver,
            thread: Some(thread),
        })
    }

    /// Configured interval.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the next tick or `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Tick> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Every tick already queued, without blocking.
    pub fn drain(&self) -> Vec<Tick> {
        self.receiver.try_iter().collect()
    }

    /// Stop the thread and wait for it. Returns the number of ticks sent.
    ///
    /// Ticks sent before the stop stay queued for [`drain`](Self::drain).
    /// Calling it again returns 0.
    pub fn stop(&mut self) -> u64 {
        self.trigger.stop();
        let sent = self
            .thread
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0);
        tracing::debug!(ticks = sent, "frame ticker stopped");
        sent
    }
}

impl std::fmt::Debug for FrameTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameTicker")
            .field("interval", &self.interval)
            .field("running", &self.thread.is_some())
            .finish()
    }
}

impl Drop for FrameTicker {
    fn drop(&mut self) {
        // Signal only; joining here could block the owner's teardown.
        self.trigger.stop();
    }
}

fn run(interval: Duration, sender: &mpsc::Sender<Tick>, stop: &StopSignal) -> u64 {
    let mut seq = 0;
    let mut last = Instant::now();
    while !stop.wait_timeout(interval) {
        let now = Instant::now();
        seq += 1;
        let tick = Tick {
            seq,
            elapsed: now.duration_since(last),
        };
        last = now;
        if sender.send(tick).is_err() {
            tracing::trace!(seq, "frame ticker receiver gone");
            break;
        }
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_signal_starts_clear() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.is_stopped());
        assert!(!signal.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn stop_signal_wakes_waiter() {
        let (signal, trigger) = StopSignal::new();
        trigger.stop();
        assert!(signal.is_stopped());
        assert!(signal.wait_timeout(Duration::from_secs(10)));
    }

    #[test]
    fn ticker_delivers_ordered_ticks() {
        let mut ticker = FrameTicker::spawn(Duration::from_millis(1)).unwrap();
        let first = ticker.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = ticker.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert!(second.elapsed >= Duration::from_millis(1));
        let sent = ticker.stop();
        assert!(sent >= 2);
    }

    #[test]
    fn nothing_arrives_after_stop() {
        let mut ticker = FrameTicker::spawn(Duration::from_millis(1)).unwrap();
        let mut received = u64::from(ticker.recv_timeout(Duration::from_secs(5)).is_some());
        let sent = ticker.stop();
        received += ticker.drain().len() as u64;
        assert_eq!(received, sent);
        assert_eq!(ticker.recv_timeout(Duration::from_millis(20)), None);
        assert_eq!(ticker.stop(), 0);
    }
}
