//! Generic debounce + cancel + last-writer-wins primitive
//!
//! One [`Debouncer`] guards one input field. Every input change cancels
//! the pending timer and any in-flight extraction; only a result whose
//! tagged input still matches the field's current value is ever applied.
//! Superseded and torn-down work resolves silently — cancellation is
//! not an error and never surfaces to the user.
//!
//! State machine per field: `Idle -> Pending(timer) -> InFlight(request)
//! -> Applied | Idle`.

use crate::service::EnrichError;
use futures::future::{AbortHandle, Abortable, BoxFuture};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Where the field currently sits in its settle cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing scheduled
    Idle,
    /// Debounce timer running
    Pending,
    /// Extraction request issued, awaiting result
    InFlight,
    /// Most recent settled input has been applied
    Applied,
}

type ExtractFn<I, O> = dyn Fn(I) -> BoxFuture<'static, Result<O, EnrichError>> + Send + Sync;
type GateFn<I> = dyn Fn(&I) -> bool + Send + Sync;
type ApplyFn<I, O> = dyn Fn(&I, &O) + Send + Sync;

struct Inner<I, O> {
    /// The field's current value, as of the latest input event
    current: Option<I>,
    /// Last successfully issued input (recorded optimistically at issue
    /// time so identical repeated input never re-fires; cleared when the
    /// extraction fails so the same text can retry)
    last_processed: Option<I>,
    /// Most recently applied output
    applied: Option<O>,
    /// Most recent non-cancellation failure, retryable
    last_error: Option<EnrichError>,
    phase: Phase,
    /// Monotonic cycle counter; completions from older cycles are inert
    generation: u64,
    timer: Option<JoinHandle<()>>,
    in_flight: Option<AbortHandle>,
    closed: bool,
}

impl<I, O> Inner<I, O> {
    fn cancel_outstanding(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(request) = self.in_flight.take() {
            request.abort();
        }
    }
}

/// Debounced, cancelable extraction for one input field
///
/// Generic over the input (`I`) and extraction output (`O`) so the same
/// primitive serves quick-add text and attachment analysis without
/// per-call-site reimplementation.
pub struct Debouncer<I, O> {
    delay: Duration,
    inner: Arc<Mutex<Inner<I, O>>>,
    extract: Arc<ExtractFn<I, O>>,
    gate: Arc<GateFn<I>>,
    on_apply: Arc<ApplyFn<I, O>>,
}

impl<I, O> Debouncer<I, O>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    O: Send + 'static,
{
    /// Create a debouncer around an extraction function
    #[must_use]
    pub fn new<F>(delay: Duration, extract: F) -> Self
    where
        F: Fn(I) -> BoxFuture<'static, Result<O, EnrichError>> + Send + Sync + 'static,
    {
        Self {
            delay,
            inner: Arc::new(Mutex::new(Inner {
                current: None,
                last_processed: None,
                applied: None,
                last_error: None,
                phase: Phase::Idle,
                generation: 0,
                timer: None,
                in_flight: None,
                closed: false,
            })),
            extract: Arc::new(extract),
            gate: Arc::new(|_input: &I| true),
            on_apply: Arc::new(|_input: &I, _output: &O| {}),
        }
    }

    /// Gate deciding whether an input is worth extracting at all
    /// (e.g. trivially short text never schedules work)
    #[must_use]
    pub fn with_gate<G>(mut self, gate: G) -> Self
    where
        G: Fn(&I) -> bool + Send + Sync + 'static,
    {
        self.gate = Arc::new(gate);
        self
    }

    /// Callback invoked when a result wins and is applied
    #[must_use]
    pub fn with_on_apply<A>(mut self, on_apply: A) -> Self
    where
        A: Fn(&I, &O) + Send + Sync + 'static,
    {
        self.on_apply = Arc::new(on_apply);
        self
    }

    /// Feed a new input value (one keystroke / file selection)
    ///
    /// Always cancels outstanding work for the previous value first.
    /// A new cycle is scheduled only when the debouncer is open, the
    /// gate accepts the value, and it differs from the last processed
    /// input.
    pub fn on_input(&self, input: I) {
        let mut inner = self.inner.lock();
        inner.cancel_outstanding();
        inner.current = Some(input.clone());
        inner.phase = Phase::Idle;

        if inner.closed || !(self.gate)(&input) {
            return;
        }
        if inner.last_processed.as_ref() == Some(&input) {
            return;
        }

        inner.generation += 1;
        let generation = inner.generation;
        inner.phase = Phase::Pending;

        let cycle = Cycle {
            inner: Arc::clone(&self.inner),
            extract: Arc::clone(&self.extract),
            on_apply: Arc::clone(&self.on_apply),
        };
        let delay = self.delay;
        inner.timer = Some(tokio::spawn(async move {
            cycle.run(input, generation, delay).await;
        }));
    }

    /// Most recently applied output
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<O>
    where
        O: Clone,
    {
        self.inner.lock().applied.clone()
    }

    /// Most recent retryable failure, if any
    #[inline]
    #[must_use]
    pub fn last_error(&self) -> Option<EnrichError> {
        self.inner.lock().last_error.clone()
    }

    /// Current settle-cycle phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Tear down: cancel timer and request on every exit path
    ///
    /// After close, no dangling work can mutate state; further inputs
    /// are ignored.
    pub fn close(&self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.cancel_outstanding();
        inner.phase = Phase::Idle;
    }
}

impl<I, O> Drop for Debouncer<I, O> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.closed = true;
        inner.cancel_outstanding();
    }
}

/// One settle cycle: sleep, then extract, then maybe apply
struct Cycle<I, O> {
    inner: Arc<Mutex<Inner<I, O>>>,
    extract: Arc<ExtractFn<I, O>>,
    on_apply: Arc<ApplyFn<I, O>>,
}

impl<I, O> Cycle<I, O>
where
    I: Clone + PartialEq + Send + Sync + 'static,
    O: Send + 'static,
{
    async fn run(self, input: I, generation: u64, delay: Duration) {
        tokio::time::sleep(delay).await;

        let request = {
            let mut inner = self.inner.lock();
            // A newer keystroke aborted this task already in the common
            // case; the generation check closes the remaining race.
            if inner.closed
                || inner.generation != generation
                || inner.current.as_ref() != Some(&input)
            {
                return;
            }
            inner.last_processed = Some(input.clone());
            inner.phase = Phase::InFlight;
            let (abort, registration) = AbortHandle::new_pair();
            inner.in_flight = Some(abort);
            Abortable::new((self.extract)(input.clone()), registration)
        };

        match request.await {
            Ok(Ok(output)) => {
                let wins = {
                    let mut inner = self.inner.lock();
                    let wins = !inner.closed
                        && inner.generation == generation
                        && inner.current.as_ref() == Some(&input);
                    if wins {
                        inner.in_flight = None;
                        inner.last_error = None;
                        inner.phase = Phase::Applied;
                    } else {
                        tracing::debug!("discarding stale extraction result");
                    }
                    wins
                };
                if wins {
                    (self.on_apply)(&input, &output);
                    self.inner.lock().applied = Some(output);
                }
            }
            Ok(Err(error)) => {
                let mut inner = self.inner.lock();
                if inner.generation == generation && !inner.closed {
                    tracing::warn!(%error, "extraction failed");
                    inner.in_flight = None;
                    // The input never actually processed; re-entering the
                    // same text must retry, not dedupe against a failure.
                    inner.last_processed = None;
                    inner.last_error = Some(error);
                    inner.phase = Phase::Idle;
                }
            }
            Err(_aborted) => {
                // Superseded or torn down; silence is the contract.
                tracing::trace!("extraction request aborted");
            }
        }
    }
}
