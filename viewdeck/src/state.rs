//! Shared reactive state handles.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use crate::error::{Error, Result};

/// Shared state cell. Reads and writes go through closures; every update
/// notifies subscribers, which is how background tasks drive redraws.
pub struct Entity<T: Send + Sync> {
    inner: Arc<RwLock<T>>,
    tx: watch::Sender<()>,
}

impl<T: Send + Sync> Entity<T> {
    /// Create a new entity with the given initial value.
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(());
        Self {
            inner: Arc::new(RwLock::new(value)),
            tx,
        }
    }

    /// Read the inner value using a closure.
    pub fn read<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.read().map_err(|_| Error::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Update the inner value using a closure and notify subscribers.
    pub fn update<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.write().map_err(|_| Error::LockPoisoned)?;
        let res = f(&mut guard);
        drop(guard);
        let _ = self.tx.send(());
        Ok(res)
    }

    /// Subscribe to change notifications for this entity.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.tx.subscribe()
    }
}

impl<T: Send + Sync> Clone for Entity<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            tx: watch::Sender::clone(&self.tx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_notifies_subscribers() {
        let entity = Entity::new(0u32);
        let mut rx = entity.subscribe();

        entity.update(|v| *v = 7).unwrap();
        assert!(rx.changed().await.is_ok());
        assert_eq!(entity.read(|v| *v).unwrap(), 7);
    }
}
