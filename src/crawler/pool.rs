//! Bounded worker pool
//!
//! Wraps a [`JoinSet`] so that at most `capacity` tasks are unresolved at any
//! time. Submitting to a full pool waits for a running task to finish first,
//! which keeps memory flat no matter how many items a listing yields.

use std::collections::HashMap;
use std::future::Future;
use tokio::task::{Id, JoinError, JoinSet};

/// A resolved task together with the key it was submitted under
#[derive(Debug)]
pub struct Completed<K, T> {
    pub key: K,
    pub result: Result<T, JoinError>,
}

/// Fixed-size pool of tokio tasks keyed by a caller-chosen label
pub struct WorkerPool<K, T> {
    capacity: usize,
    tasks: JoinSet<T>,
    pending: HashMap<Id, K>,
}

impl<K, T> WorkerPool<K, T>
where
    T: Send + 'static,
{
    /// Creates a pool running at most `capacity` tasks (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tasks: JoinSet::new(),
            pending: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tasks submitted but not yet collected
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Spawns `task`, waiting for a free slot if the pool is full
    ///
    /// # Returns
    ///
    /// Tasks that were collected while waiting for the slot.
    pub async fn submit<F>(&mut self, key: K, task: F) -> Vec<Completed<K, T>>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let mut finished = Vec::new();
        while self.tasks.len() >= self.capacity {
            match self.tasks.join_next_with_id().await {
                Some(joined) => finished.extend(self.complete(joined)),
                None => break,
            }
        }

        let handle = self.tasks.spawn(task);
        self.pending.insert(handle.id(), key);
        finished
    }

    /// Waits for every submitted task to resolve
    pub async fn drain(&mut self) -> Vec<Completed<K, T>> {
        let mut finished = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next_with_id().await {
            finished.extend(self.complete(joined));
        }
        finished
    }

    fn complete(&mut self, joined: Result<(Id, T), JoinError>) -> Option<Completed<K, T>> {
        match joined {
            Ok((id, value)) => self.pending.remove(&id).map(|key| Completed {
                key,
                result: Ok(value),
            }),
            Err(error) => self.pending.remove(&error.id()).map(|key| Completed {
                key,
                result: Err(error),
            }),
        }
    }
}
