//! Per-chat lock table
//!
//! One async mutex per chat currently being mutated. Chats never share a
//! lock, and an entry is dropped as soon as no task holds or waits on it, so
//! the table only ever contains in-flight chats.

use dashmap::DashMap;
use relay_core::ChatId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock entry plus the number of tasks holding or waiting on it
#[derive(Default)]
struct Slot {
    mutex: Arc<Mutex<()>>,
    users: AtomicUsize,
}

#[derive(Default)]
pub struct ChatLocks {
    inner: DashMap<ChatId, Slot>,
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a chat
    ///
    /// Cancelling the returned future releases the registration, so a
    /// waiter dropped mid-wait never leaves its entry behind.
    pub async fn lock(&self, chat_id: &ChatId) -> ChatGuard<'_> {
        // Register under the shard lock so `release` can never drop an entry
        // another task is about to wait on.
        let mutex = {
            let slot = self.inner.entry(chat_id.clone()).or_default();
            slot.users.fetch_add(1, Ordering::AcqRel);
            Arc::clone(&slot.mutex)
        };

        let registration = Registration {
            locks: self,
            chat_id: chat_id.clone(),
        };
        let guard = mutex.lock_owned().await;
        ChatGuard {
            _guard: guard,
            _registration: registration,
        }
    }

    /// Number of chats with a live lock entry
    pub fn active(&self) -> usize {
        self.inner.len()
    }

    fn release(&self, chat_id: &ChatId) {
        if let Some(slot) = self.inner.get(chat_id) {
            slot.users.fetch_sub(1, Ordering::AcqRel);
        }
        self.inner
            .remove_if(chat_id, |_, slot| slot.users.load(Ordering::Acquire) == 0);
    }
}

/// One task's claim on a chat entry, held while waiting and while locked
struct Registration<'a> {
    locks: &'a ChatLocks,
    chat_id: ChatId,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.chat_id);
    }
}

/// Exclusive access to one chat, released on drop
pub struct ChatGuard<'a> {
    // Field order matters: the mutex is unlocked before the entry is released.
    _guard: OwnedMutexGuard<()>,
    _registration: Registration<'a>,
}
