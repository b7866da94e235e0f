//! The shared board: one store, one notifier, and the lock between them.
//!
//! Readers share the store through [`Board::read`]. Writers go through
//! [`Board::mutations`], which holds the write lock for as long as the
//! returned [`MutationEngine`] lives, so each mutation and its
//! notification happen with no reader in between.

use eventboard_store::EntityStore;
use eventboard_types::EntityKind;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::mutation::MutationEngine;
use crate::notifier::ChangeNotifier;

/// Write access to the board's store, paired with its notifier.
pub type BoardMutations<'a> = MutationEngine<'a, RwLockWriteGuard<'a, EntityStore>>;

/// Record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct BoardCounts {
    /// Number of users.
    pub users: usize,
    /// Number of locations.
    pub locations: usize,
    /// Number of events.
    pub events: usize,
    /// Number of participant records.
    pub participants: usize,
}

impl BoardCounts {
    /// Count the records currently in `store`.
    pub fn of(store: &EntityStore) -> Self {
        Self {
            users: store.count(EntityKind::User),
            locations: store.count(EntityKind::Location),
            events: store.count(EntityKind::Event),
            participants: store.count(EntityKind::Participant),
        }
    }
}

/// The process-wide store and its change notifier.
#[derive(Debug)]
pub struct Board {
    store: RwLock<EntityStore>,
    notifier: ChangeNotifier,
}

impl Board {
    /// An empty board whose topic channels buffer `channel_capacity`
    /// changes.
    pub fn new(channel_capacity: usize) -> Self {
        Self::with_store(EntityStore::new(), channel_capacity)
    }

    /// A board starting from an already populated store, typically one
    /// loaded from a seed document.
    pub fn with_store(store: EntityStore, channel_capacity: usize) -> Self {
        Self {
            store: RwLock::new(store),
            notifier: ChangeNotifier::new(channel_capacity),
        }
    }

    /// Shared read access to the store.
    pub async fn read(&self) -> RwLockReadGuard<'_, EntityStore> {
        self.store.read().await
    }

    /// Exclusive write access to the store for a batch of mutations.
    pub async fn mutations(&self) -> BoardMutations<'_> {
        MutationEngine::new(self.store.write().await, &self.notifier)
    }

    /// The notifier that mutations publish on.
    pub const fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// Current record counts per collection.
    pub async fn counts(&self) -> BoardCounts {
        BoardCounts::of(&*self.read().await)
    }

    /// Empty every collection without publishing. Used at shutdown.
    ///
    /// The returned counts describe exactly the records that were removed.
    pub async fn teardown(&self) -> BoardCounts {
        let mut store = self.store.write().await;
        let counts = BoardCounts::of(&store);
        *store = EntityStore::new();
        drop(store);
        info!(
            users = counts.users,
            locations = counts.locations,
            events = counts.events,
            participants = counts.participants,
            "board torn down"
        );
        counts
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::notifier::DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eventboard_types::{ChangeKind, NewLocation, NewUser, Topic, User};

    use super::*;

    #[tokio::test]
    async fn mutation_is_visible_to_readers_and_subscribers() {
        let board = Board::default();
        let mut created = board.notifier().subscribe_to::<User>(ChangeKind::Created);

        let user = {
            let mut engine = board.mutations().await;
            engine
                .create_user(NewUser {
                    username: String::from("ada"),
                    email: None,
                })
                .unwrap()
        };

        assert_eq!(created.recv().await, Some(user.clone()));
        assert_eq!(board.read().await.users().find_by_id(&user.id), Some(&user));
    }

    #[tokio::test]
    async fn counts_and_teardown() {
        let board = Board::default();
        let mut deleted = board
            .notifier()
            .subscribe(Topic::new(EntityKind::Location, ChangeKind::Deleted));
        {
            let mut engine = board.mutations().await;
            for name in ["Hall", "Lobby"] {
                let _ = engine
                    .create_location(NewLocation {
                        name: String::from(name),
                        desc: String::new(),
                    })
                    .unwrap();
            }
        }

        let counts = board.counts().await;
        assert_eq!(counts.locations, 2);
        assert_eq!(counts.users, 0);

        assert_eq!(board.teardown().await, counts);
        assert_eq!(board.counts().await, BoardCounts::default());
        assert!(deleted.try_recv_change().is_none());
    }

    #[tokio::test]
    async fn oversized_capacity_does_not_panic() {
        let board = Board::new(usize::MAX);
        assert_eq!(
            board.notifier().capacity(),
            crate::notifier::MAX_CHANNEL_CAPACITY
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn teardown_counts_match_removed_records() {
        let board = std::sync::Arc::new(Board::default());
        let mut handles = Vec::new();
        for i in 0..32 {
            let board = std::sync::Arc::clone(&board);
            handles.push(tokio::spawn(async move {
                let mut engine = board.mutations().await;
                engine
                    .create_user(NewUser {
                        username: format!("user{i}"),
                        email: None,
                    })
                    .unwrap()
            }));
        }
        let removed = board.teardown().await;
        for handle in handles {
            let _ = handle.await.unwrap();
        }
        let remaining = board.counts().await;
        assert_eq!(removed.users.checked_add(remaining.users), Some(32));
    }

    #[tokio::test]
    async fn concurrent_writers_are_serialized() {
        let board = std::sync::Arc::new(Board::default());
        let mut handles = Vec::new();
        for i in 0..8 {
            let board = std::sync::Arc::clone(&board);
            handles.push(tokio::spawn(async move {
                let mut engine = board.mutations().await;
                engine
                    .create_user(NewUser {
                        username: format!("user{i}"),
                        email: None,
                    })
                    .unwrap()
            }));
        }
        for handle in handles {
            let _ = handle.await.unwrap();
        }
        assert_eq!(board.counts().await.users, 8);
    }
}
