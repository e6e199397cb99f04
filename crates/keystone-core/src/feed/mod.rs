//! Thinking feed: ephemeral, self-expiring lines shown while a run is active.
//!
//! The feed is retrospective. Lines are derived from a response that has
//! already arrived and replayed at a fixed spacing; they are not a real-time
//! progress signal.
//!
//! Every line owns an expiry task that removes only that line after
//! [`LINE_TTL`]. A sequence queued with [`ThinkingFeed::enqueue_sequence`]
//! owns one task per line. All of these tasks are tracked as cancellable
//! handles and aborted by [`ThinkingFeed::clear`], which also runs when the
//! feed is dropped, so no timer fires after its owner is gone.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//!
//! use keystone_core::feed::ThinkingFeed;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let feed = ThinkingFeed::new();
//! feed.enqueue("Reading the scope of work...");
//! assert_eq!(feed.lines().len(), 1);
//!
//! feed.enqueue_sequence(["Found 12 line items.", "Grouping by trade."], Duration::from_millis(800));
//! feed.clear();
//! assert!(feed.lines().is_empty());
//! # }
//! ```

mod snippets;

use std::{
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, Weak,
    },
    time::Duration,
};

use log::debug;
use tokio::{sync::watch, task::JoinHandle, time::sleep};

pub use snippets::{brief_fallback, extract_snippets, tasks_fallback, MAX_SNIPPETS};

use crate::models::ThinkingLine;

/// How long a line stays visible.
pub const LINE_TTL: Duration = Duration::from_millis(4000);

/// Default gap between lines of one sequence.
pub const DEFAULT_SPACING: Duration = Duration::from_millis(1200);

/// Scheduler for thinking lines.
pub struct ThinkingFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    lines: watch::Sender<Vec<ThinkingLine>>,
    next_id: AtomicU64,
    // Bumped whenever pending sequence lines must not appear anymore.
    epoch: AtomicU64,
    // Sequence lines of the current epoch not shown yet.
    queued: AtomicUsize,
    ttl: Duration,
    timers: Mutex<Timers>,
}

#[derive(Default)]
struct Timers {
    sequence: Vec<JoinHandle<()>>,
    expiries: Vec<JoinHandle<()>>,
}

fn lock(timers: &Mutex<Timers>) -> MutexGuard<'_, Timers> {
    timers.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ThinkingFeed {
    /// Creates an empty feed whose lines expire after [`LINE_TTL`].
    pub fn new() -> Self {
        Self::with_ttl(LINE_TTL)
    }

    /// Creates an empty feed with a custom line lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        let (lines, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(FeedInner {
                lines,
                next_id: AtomicU64::new(1),
                epoch: AtomicU64::new(0),
                queued: AtomicUsize::new(0),
                ttl,
                timers: Mutex::new(Timers::default()),
            }),
        }
    }

    /// Shows a line immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, text: impl Into<String>) {
        FeedInner::show(&self.inner, text.into(), None);
    }

    /// Replays `lines` one after another, `spacing` apart.
    ///
    /// Lines of a previous sequence that have not appeared yet are cancelled;
    /// lines already on screen stay until they expire. The first line is also
    /// scheduled rather than shown inline.
    pub fn enqueue_sequence<I, S>(&self, lines: I, spacing: Duration)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let mut timers = lock(&self.inner.timers);
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.queued.store(lines.len(), Ordering::SeqCst);
        for handle in timers.sequence.drain(..) {
            handle.abort();
        }

        for (index, text) in lines.into_iter().enumerate() {
            let delay = spacing.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));
            let weak = Arc::downgrade(&self.inner);
            timers.sequence.push(tokio::spawn(async move {
                sleep(delay).await;
                if let Some(inner) = weak.upgrade() {
                    FeedInner::show(&inner, text, Some(epoch));
                }
            }));
        }
    }

    /// Cancels every pending timer and empties the feed.
    pub fn clear(&self) {
        {
            let mut timers = lock(&self.inner.timers);
            self.inner.epoch.fetch_add(1, Ordering::SeqCst);
            self.inner.queued.store(0, Ordering::SeqCst);
            let Timers {
                sequence,
                expiries,
            } = &mut *timers;
            for handle in sequence.drain(..).chain(expiries.drain(..)) {
                handle.abort();
            }
        }
        self.inner.lines.send_if_modified(|lines| {
            let had_lines = !lines.is_empty();
            lines.clear();
            had_lines
        });
    }

    /// Currently visible lines, oldest first.
    pub fn lines(&self) -> Vec<ThinkingLine> {
        self.inner.lines.borrow().clone()
    }

    /// Receiver notified whenever the visible lines change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ThinkingLine>> {
        self.inner.lines.subscribe()
    }

    /// Lines of the current sequence that have not appeared yet.
    ///
    /// A line leaves the count in the same update that makes it visible, so a
    /// subscriber woken by that update already sees the lower count.
    pub fn queued_lines(&self) -> usize {
        self.inner.queued.load(Ordering::SeqCst)
    }

    /// Number of timers that have not fired yet.
    #[cfg(test)]
    pub(crate) fn pending_timers(&self) -> usize {
        let timers = lock(&self.inner.timers);
        timers
            .sequence
            .iter()
            .chain(timers.expiries.iter())
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Default for ThinkingFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ThinkingFeed {
    fn drop(&mut self) {
        self.clear();
    }
}

impl FeedInner {
    /// Appends a line and starts its expiry timer.
    ///
    /// Sequence lines pass the epoch they were scheduled in and are dropped
    /// if the feed was cleared or re-sequenced since.
    fn show(this: &Arc<Self>, text: String, epoch: Option<u64>) {
        let id = this.next_id.fetch_add(1, Ordering::Relaxed);
        let shown = this.lines.send_if_modified(|lines| {
            if let Some(epoch) = epoch {
                if epoch != this.epoch.load(Ordering::SeqCst) {
                    return false;
                }
                let _ = this
                    .queued
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            }
            lines.push(ThinkingLine { id, text });
            true
        });

        if shown {
            Self::schedule_expiry(this, id);
        }
    }

    fn schedule_expiry(this: &Arc<Self>, id: u64) {
        let weak: Weak<Self> = Arc::downgrade(this);
        let ttl = this.ttl;
        let handle = tokio::spawn(async move {
            sleep(ttl).await;
            if let Some(inner) = weak.upgrade() {
                inner.remove(id);
            }
        });

        let mut timers = lock(&this.timers);
        timers.expiries.retain(|handle| !handle.is_finished());
        timers.expiries.push(handle);
    }

    fn remove(&self, id: u64) {
        self.lines.send_if_modified(|lines| {
            let before = lines.len();
            lines.retain(|line| line.id != id);
            before != lines.len()
        });
        debug!("thinking line {id} expired");
    }
}
