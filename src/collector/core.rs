//! The collector core: buffering, flush triggers, and the drain loop.

use std::mem;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace, warn};

use crate::collector::config::CollectorConfig;
use crate::collector::timer::DebounceTimer;
use crate::error::Error;
use crate::worker::{BatchWorker, ErrorHandler};
use crate::Result;

struct State<T> {
    buffer: Vec<T>,
    busy: bool,
    timer: DebounceTimer,
}

struct Shared<T> {
    config: CollectorConfig,
    worker: Arc<dyn BatchWorker<T>>,
    on_error: Arc<dyn ErrorHandler>,
    state: Mutex<State<T>>,
}

/// Debounced, size-bounded batching buffer.
///
/// Items submitted one at a time accumulate in an internal buffer and are
/// handed to the worker as one batch when either the size threshold is met
/// or the quiescence duration elapses after the most recent submission. At
/// most one worker invocation is in flight per collector; items arriving
/// during a flush are drained into follow-up batches back-to-back, with no
/// further quiescence wait, until the buffer is empty.
///
/// Batches preserve submission order and partition it: every item of batch N
/// precedes every item of batch N+1, and no item is duplicated or dropped
/// while the worker succeeds. A failed batch is reported once to the error
/// handler and then dropped; it never blocks the batches behind it.
///
/// Cloning yields another handle to the same buffer, so any number of
/// producers can submit concurrently. All methods must be called from within
/// a tokio runtime, since flushes and timers run as spawned tasks. A hung
/// worker holds the collector in the flushing state indefinitely; there is
/// no watchdog.
pub struct Collector<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Collector<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Collector<T> {
    /// Create a collector from its configuration and collaborators.
    ///
    /// Fails with [`Error::Configuration`] when the config is invalid
    /// (`size_threshold` of zero).
    pub fn new(
        config: CollectorConfig,
        worker: impl BatchWorker<T> + 'static,
        on_error: impl ErrorHandler + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                worker: Arc::new(worker),
                on_error: Arc::new(on_error),
                state: Mutex::new(State {
                    buffer: Vec::new(),
                    busy: false,
                    timer: DebounceTimer::default(),
                }),
            }),
        })
    }

    /// Submit one item.
    ///
    /// Performs only synchronous bookkeeping (append, timer cancel/arm) and
    /// never waits for the worker. Each arrival resets the idle clock: an
    /// armed quiescence timer is cancelled before the item is appended. While
    /// a flush is in flight the item is appended and nothing else happens;
    /// the drain loop picks it up once the current worker call completes.
    pub fn submit(&self, item: T) {
        let mut st = self.shared.state.lock().unwrap();
        st.timer.cancel();
        st.buffer.push(item);
        if st.busy {
            return;
        }
        let len = st.buffer.len();
        let config = &self.shared.config;
        if config.threshold_policy.is_met(len, config.size_threshold) {
            st.busy = true;
            drop(st);
            trace!(len, "size threshold met, flushing");
            Self::spawn_flush(Arc::clone(&self.shared));
        } else {
            let generation = st.timer.current_generation();
            let quiescence = config.quiescence;
            let shared = Arc::clone(&self.shared);
            st.timer.arm(tokio::spawn(async move {
                tokio::time::sleep(quiescence).await;
                Self::on_timer_fired(shared, generation);
            }));
        }
    }

    /// Flush the current buffer immediately, regardless of threshold or
    /// timer.
    ///
    /// No-op when the buffer is empty or a flush is already in flight (the
    /// drain loop covers the buffered items in that case).
    pub fn flush_now(&self) {
        let mut st = self.shared.state.lock().unwrap();
        st.timer.cancel();
        if st.busy || st.buffer.is_empty() {
            return;
        }
        st.busy = true;
        drop(st);
        trace!("manual flush");
        Self::spawn_flush(Arc::clone(&self.shared));
    }

    /// Number of buffered items not yet handed to the worker.
    pub fn len(&self) -> usize {
        self.shared.state.lock().unwrap().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a worker invocation (including its drain loop) is in flight.
    pub fn is_busy(&self) -> bool {
        self.shared.state.lock().unwrap().busy
    }

    fn on_timer_fired(shared: Arc<Shared<T>>, generation: u64) {
        let mut st = shared.state.lock().unwrap();
        if !st.timer.is_current(generation) {
            // Cancelled after firing, before we took the lock.
            return;
        }
        st.timer.disarm();
        if st.busy || st.buffer.is_empty() {
            return;
        }
        st.busy = true;
        drop(st);
        trace!("quiescence elapsed, flushing");
        Self::spawn_flush(shared);
    }

    fn spawn_flush(shared: Arc<Shared<T>>) {
        tokio::spawn(Self::run_flush(shared));
    }

    /// The flush protocol.
    ///
    /// Swaps the buffer out as "this batch", awaits the worker, hands any
    /// failure to the error handler, then checks for items that accumulated
    /// during the call. Leftovers are flushed again immediately, with no
    /// timer re-arm and no threshold re-check, until the buffer is empty;
    /// only then is the busy flag cleared. An explicit loop rather than
    /// recursion, so sustained backlog cannot grow the call stack.
    async fn run_flush(shared: Arc<Shared<T>>) {
        loop {
            let batch = {
                let mut st = shared.state.lock().unwrap();
                mem::take(&mut st.buffer)
            };
            debug!(len = batch.len(), "flushing batch");
            if let Err(source) = shared.worker.process(batch).await {
                let error = Error::Worker(source);
                warn!(%error, "batch worker failed, batch dropped");
                // The handler's own outcome is deliberately not observed.
                let _ = shared.on_error.handle(error).await;
            }
            let mut st = shared.state.lock().unwrap();
            if st.buffer.is_empty() {
                st.busy = false;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::config::ThresholdPolicy;
    use crate::error::BoxError;
    use crate::worker::{error_handler_fn, worker_fn, NoopErrorHandler};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio_test::assert_ok;

    fn never_flushing_config() -> CollectorConfig {
        CollectorConfig::new()
            .with_size_threshold(1000)
            .with_quiescence(Duration::from_secs(3600))
    }

    fn sink_worker() -> impl BatchWorker<u32> {
        worker_fn(|_batch: Vec<u32>| async move { Ok::<(), BoxError>(()) })
    }

    #[tokio::test]
    async fn test_new_rejects_zero_threshold() {
        let result = Collector::new(
            CollectorConfig::new().with_size_threshold(0),
            sink_worker(),
            NoopErrorHandler,
        );
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_len_tracks_buffered_items() {
        let collector =
            assert_ok!(Collector::new(never_flushing_config(), sink_worker(), NoopErrorHandler));
        assert!(collector.is_empty());
        collector.submit(1);
        collector.submit(2);
        assert_eq!(collector.len(), 2);
        assert!(!collector.is_empty());
        assert!(!collector.is_busy());
    }

    #[tokio::test]
    async fn test_clones_share_one_buffer() {
        let collector =
            Collector::new(never_flushing_config(), sink_worker(), NoopErrorHandler).unwrap();
        let other = collector.clone();
        collector.submit(1);
        other.submit(2);
        assert_eq!(collector.len(), 2);
        assert_eq!(other.len(), 2);
    }

    #[tokio::test]
    async fn test_threshold_flush_delivers_whole_buffer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let collector = Collector::new(
            CollectorConfig::new()
                .with_size_threshold(3)
                .with_quiescence(Duration::from_secs(3600)),
            worker_fn(move |batch: Vec<u32>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(batch);
                    Ok::<(), BoxError>(())
                }
            }),
            NoopErrorHandler,
        )
        .unwrap();

        collector.submit(1);
        collector.submit(2);
        collector.submit(3);
        assert_eq!(rx.recv().await.unwrap(), vec![1, 2, 3]);
        assert!(collector.is_empty());
    }

    #[tokio::test]
    async fn test_exceeds_policy_waits_for_one_more() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let collector = Collector::new(
            CollectorConfig::new()
                .with_size_threshold(3)
                .with_quiescence(Duration::from_secs(3600))
                .with_threshold_policy(ThresholdPolicy::Exceeds),
            worker_fn(move |batch: Vec<u32>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(batch);
                    Ok::<(), BoxError>(())
                }
            }),
            NoopErrorHandler,
        )
        .unwrap();

        collector.submit(1);
        collector.submit(2);
        collector.submit(3);
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());

        collector.submit(4);
        assert_eq!(rx.recv().await.unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_flush_now_bypasses_threshold() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let collector = Collector::new(
            never_flushing_config(),
            worker_fn(move |batch: Vec<u32>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(batch);
                    Ok::<(), BoxError>(())
                }
            }),
            NoopErrorHandler,
        )
        .unwrap();

        collector.submit(7);
        collector.submit(8);
        collector.flush_now();
        assert_eq!(rx.recv().await.unwrap(), vec![7, 8]);
    }

    #[tokio::test]
    async fn test_flush_now_on_empty_buffer_is_noop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let collector = Collector::new(
            never_flushing_config(),
            worker_fn(move |batch: Vec<u32>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(batch);
                    Ok::<(), BoxError>(())
                }
            }),
            NoopErrorHandler,
        )
        .unwrap();

        collector.flush_now();
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(!collector.is_busy());
    }

    #[tokio::test]
    async fn test_worker_failure_reaches_error_handler() {
        let (err_tx, mut err_rx) = mpsc::unbounded_channel();
        let collector = Collector::new(
            CollectorConfig::new()
                .with_size_threshold(1)
                .with_quiescence(Duration::from_secs(3600)),
            worker_fn(|_batch: Vec<u32>| async move {
                Err::<(), BoxError>("bulk write refused".into())
            }),
            error_handler_fn(move |error: Error| {
                let err_tx = err_tx.clone();
                async move {
                    let _ = err_tx.send(error.to_string());
                    Ok::<(), BoxError>(())
                }
            }),
        )
        .unwrap();

        collector.submit(1);
        let report = err_rx.recv().await.unwrap();
        assert_eq!(report, "batch worker failed: bulk write refused");
    }
}
