//! Update Queue / Throttler
//!
//! Outgoing toggles are queued and drained by a single loop. The serial
//! policy sends one request at a time with a fixed delay; the batched policy
//! waits one throttle window, then flushes bounded batches concurrently.
//! Two updates touching the same chore never share a batch, so a chore's
//! updates reach the server in the order they were issued.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use futures::future::{join_all, LocalBoxFuture};

use crate::config::{QueuePolicy, SyncConfig};
use crate::error::ApiError;
use crate::sync::{PendingUpdate, Ticket};

/// Sends one update to the server
pub trait Transport {
    fn send(&self, update: &PendingUpdate) -> LocalBoxFuture<'static, Result<(), ApiError>>;
}

/// Suspends the drain loop; swapped for an instant fake in tests
pub trait Scheduler {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
}

#[derive(Debug)]
pub struct UpdateQueue {
    config: SyncConfig,
    pending: VecDeque<PendingUpdate>,
    processing: bool,
}

impl UpdateQueue {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            pending: VecDeque::new(),
            processing: false,
        }
    }

    /// Never blocks; the caller kicks the drain loop separately
    pub fn enqueue(&mut self, update: PendingUpdate) {
        log::debug!(target: "[QUEUE]", "queued update {} ({} waiting)", update.ticket, self.pending.len() + 1);
        self.pending.push_back(update);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Nothing waiting and nothing in flight
    pub fn is_idle(&self) -> bool {
        !self.processing && self.pending.is_empty()
    }

    fn batch_limit(&self) -> usize {
        match self.config.policy {
            QueuePolicy::Serial => 1,
            QueuePolicy::Batched => self.config.batch_size.max(1),
        }
    }

    /// Delay before the first flush, so quick successive ticks share a batch
    pub fn collect_window_ms(&self) -> u32 {
        match self.config.policy {
            QueuePolicy::Serial => 0,
            QueuePolicy::Batched => self.config.throttle_window_ms,
        }
    }

    pub fn pause_ms(&self) -> u32 {
        match self.config.policy {
            QueuePolicy::Serial => self.config.serial_delay_ms,
            QueuePolicy::Batched => self.config.inter_batch_delay_ms,
        }
    }

    /// Take the next batch in FIFO order.
    ///
    /// An update is skipped (left queued) when an earlier update in the
    /// queue writes one of its chores; updates for other chores may go ahead.
    /// A section request writes every member, not only the ones it changed.
    pub fn next_batch(&mut self) -> Vec<PendingUpdate> {
        let limit = self.batch_limit();
        let mut blocked: HashSet<u32> = HashSet::new();
        let mut batch = Vec::new();
        let mut kept = VecDeque::with_capacity(self.pending.len());

        while let Some(update) = self.pending.pop_front() {
            let conflicts = update.covers.iter().any(|id| blocked.contains(id));
            blocked.extend(update.covers.iter().copied());
            if batch.len() < limit && !conflicts {
                batch.push(update);
            } else {
                kept.push_back(update);
            }
        }
        self.pending = kept;
        batch
    }

    /// Everything not yet sent, e.g. on teardown
    pub fn take_all(&mut self) -> Vec<PendingUpdate> {
        self.pending.drain(..).collect()
    }

    fn begin(&mut self) -> bool {
        if self.processing {
            return false;
        }
        self.processing = true;
        true
    }

    fn finish(&mut self) {
        self.processing = false;
    }
}

/// Owns the queue and the means to empty it
pub struct QueueDriver<T, S> {
    queue: Rc<RefCell<UpdateQueue>>,
    transport: T,
    scheduler: S,
}

impl<T: Transport, S: Scheduler> QueueDriver<T, S> {
    pub fn new(config: SyncConfig, transport: T, scheduler: S) -> Self {
        Self {
            queue: Rc::new(RefCell::new(UpdateQueue::new(config))),
            transport,
            scheduler,
        }
    }

    pub fn enqueue(&self, update: PendingUpdate) {
        self.queue.borrow_mut().enqueue(update);
    }

    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_idle()
    }

    pub fn take_all(&self) -> Vec<PendingUpdate> {
        self.queue.borrow_mut().take_all()
    }

    /// Send everything queued, then return. Safe to call repeatedly: while
    /// one drain loop is running, further calls return at once and the
    /// running loop picks their updates up.
    ///
    /// `on_settled` is called once per update with its ticket and result;
    /// one failure does not stop the rest of the batch or queue.
    /// Returns false when another loop was already running.
    pub async fn drain(&self, mut on_settled: impl FnMut(Ticket, Result<(), ApiError>)) -> bool {
        if !self.queue.borrow_mut().begin() {
            return false;
        }

        let window = self.queue.borrow().collect_window_ms();
        if window > 0 {
            self.scheduler.sleep(window).await;
        }

        loop {
            let batch = self.queue.borrow_mut().next_batch();
            if batch.is_empty() {
                break;
            }
            log::debug!(target: "[QUEUE]", "flushing {} update(s)", batch.len());

            let results = join_all(batch.iter().map(|u| self.transport.send(u))).await;
            for (update, result) in batch.iter().zip(results) {
                if let Err(err) = &result {
                    log::error!(target: "[QUEUE]", "update {} failed: {}", update.ticket, err);
                }
                on_settled(update.ticket, result);
            }

            let (more, pause) = {
                let queue = self.queue.borrow();
                (queue.len() > 0, queue.pause_ms())
            };
            if more && pause > 0 {
                self.scheduler.sleep(pause).await;
            }
        }

        self.queue.borrow_mut().finish();
        true
    }
}
