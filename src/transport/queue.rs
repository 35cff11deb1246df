use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::error;

use crate::core::{InboundEvent, UserId};

type Senders = Arc<Mutex<HashMap<UserId, mpsc::UnboundedSender<InboundEvent>>>>;

/// Per-user FIFO of inbound events.
///
/// Each user with pending events has exactly one worker task draining that
/// user's queue in arrival order; different users are drained in parallel.
/// A worker removes its queue and exits once the queue is empty, so only
/// users with pending events occupy the map.
pub struct UserQueues<F> {
    senders: Senders,
    workers: JoinSet<()>,
    handler: Arc<F>,
}

impl<F, Fut> UserQueues<F>
where
    F: Fn(InboundEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    pub fn new(handler: F) -> Self {
        Self {
            senders: Arc::new(Mutex::new(HashMap::new())),
            workers: JoinSet::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn submit(&mut self, event: InboundEvent) {
        self.reap_finished();

        let user_id = event.user_id;
        let mut senders = self.senders.lock();
        let event = match senders.get(&user_id) {
            Some(tx) => match tx.send(event) {
                Ok(()) => return,
                // The worker died mid-queue (handler panic); start a fresh one.
                Err(mpsc::error::SendError(event)) => event,
            },
            None => event,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(event).is_err() {
            return;
        }
        senders.insert(user_id, tx);
        drop(senders);

        self.workers.spawn(drain_queue(
            user_id,
            rx,
            Arc::clone(&self.senders),
            Arc::clone(&self.handler),
        ));
    }

    /// Users that currently have a queue (pending or in-flight events).
    pub fn active_users(&self) -> usize {
        self.senders.lock().len()
    }

    /// Waits until every submitted event has been handled.
    pub async fn drain(mut self) {
        while let Some(result) = self.workers.join_next().await {
            log_worker_exit(result);
        }
    }

    fn reap_finished(&mut self) {
        while let Some(result) = self.workers.try_join_next() {
            log_worker_exit(result);
        }
    }
}

fn log_worker_exit(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        error!(error = %err, "event worker failed");
    }
}

/// Pops under the map lock so `submit` can never hand an event to a queue
/// that is about to be dropped.
async fn drain_queue<F, Fut>(
    user_id: UserId,
    mut rx: mpsc::UnboundedReceiver<InboundEvent>,
    senders: Senders,
    handler: Arc<F>,
) where
    F: Fn(InboundEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    loop {
        let event = {
            let mut senders = senders.lock();
            match rx.try_recv() {
                Ok(event) => event,
                Err(_) => {
                    senders.remove(&user_id);
                    return;
                }
            }
        };
        handler(event).await;
    }
}
