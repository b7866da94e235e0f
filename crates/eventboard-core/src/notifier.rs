//! In-process change notification fan-out.
//!
//! Each of the twelve [`Topic`]s owns a dedicated
//! [`tokio::sync::broadcast`] channel. Publishing sends one [`Change`] to
//! every receiver currently subscribed to that topic; with no receivers the
//! change is dropped. Subscribing creates a new receiver that sees only
//! changes published afterwards.
//!
//! # Backlog
//!
//! Channels are bounded. A subscriber that falls more than the channel
//! capacity behind loses the oldest undelivered changes and resumes from
//! the oldest one still buffered; the number skipped is logged.
//!
//! # Listener release
//!
//! A [`Subscription`] owns its receiver. Dropping the subscription (for
//! example when a `WebSocket` client disconnects) drops the receiver, which
//! unregisters it from the channel.

use std::sync::Arc;

use eventboard_types::{Change, ChangeKind, Entity, EntityKind, Record, Topic};
use futures::Stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, warn};

/// Default per-topic channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Largest accepted per-topic channel capacity. Each topic preallocates its
/// full ring buffer, so larger values are clamped.
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// Broadcast senders for the three change kinds of one entity kind.
#[derive(Debug)]
struct EntityChannels {
    created: broadcast::Sender<Change>,
    updated: broadcast::Sender<Change>,
    deleted: broadcast::Sender<Change>,
}

impl EntityChannels {
    fn new(capacity: usize) -> Self {
        Self {
            created: broadcast::channel(capacity).0,
            updated: broadcast::channel(capacity).0,
            deleted: broadcast::channel(capacity).0,
        }
    }

    const fn get(&self, change: ChangeKind) -> &broadcast::Sender<Change> {
        match change {
            ChangeKind::Created => &self.created,
            ChangeKind::Updated => &self.updated,
            ChangeKind::Deleted => &self.deleted,
        }
    }
}

#[derive(Debug)]
struct Channels {
    users: EntityChannels,
    locations: EntityChannels,
    events: EntityChannels,
    participants: EntityChannels,
}

/// Topic-keyed publish/subscribe hub.
///
/// Cloning is cheap; clones share the same channels.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    channels: Arc<Channels>,
    capacity: usize,
}

impl ChangeNotifier {
    /// Create a notifier whose topic channels each buffer up to `capacity`
    /// undelivered changes per subscriber. The capacity is clamped to
    /// `1..=MAX_CHANNEL_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CHANNEL_CAPACITY);
        Self {
            channels: Arc::new(Channels {
                users: EntityChannels::new(capacity),
                locations: EntityChannels::new(capacity),
                events: EntityChannels::new(capacity),
                participants: EntityChannels::new(capacity),
            }),
            capacity,
        }
    }

    /// The per-topic channel capacity.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Change> {
        let entity = match topic.entity {
            EntityKind::User => &self.channels.users,
            EntityKind::Location => &self.channels.locations,
            EntityKind::Event => &self.channels.events,
            EntityKind::Participant => &self.channels.participants,
        };
        entity.get(topic.change)
    }

    /// Deliver `record` to every current subscriber of `topic`.
    ///
    /// Returns the number of subscribers the change was queued for. Zero
    /// subscribers is not an error; the change is simply dropped. A record
    /// whose kind does not match the topic is dropped with a warning.
    pub fn publish(&self, topic: Topic, record: Record) -> usize {
        if record.kind() != topic.entity {
            warn!(%topic, kind = %record.kind(), "record kind does not match topic, dropping");
            return 0;
        }
        let change = Change::now(topic, record);
        // send only fails when there are no receivers
        let receivers = self.sender(topic).send(change).unwrap_or(0);
        debug!(%topic, receivers, "change published");
        receivers
    }

    /// Publish a typed record on the topic for its kind and `change`.
    pub fn publish_entity<E: Entity>(&self, change: ChangeKind, record: E) -> usize {
        self.publish(Topic::new(E::KIND, change), record.into_record())
    }

    /// Subscribe to `topic` from now on. Earlier changes are not replayed.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        debug!(%topic, "listener subscribed");
        Subscription {
            topic,
            rx: self.sender(topic).subscribe(),
        }
    }

    /// Subscribe to `change` events for record kind `E`, yielding typed
    /// records.
    pub fn subscribe_to<E: Entity>(&self, change: ChangeKind) -> TypedSubscription<E> {
        TypedSubscription {
            inner: self.subscribe(Topic::new(E::KIND, change)),
            _kind: core::marker::PhantomData,
        }
    }

    /// Number of live subscribers on `topic`.
    pub fn listener_count(&self, topic: Topic) -> usize {
        self.sender(topic).receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

/// A live listener on one topic.
///
/// The sequence of changes has no natural end: `recv` only returns `None`
/// once the notifier itself has been dropped. It cannot be restarted;
/// subscribe again for a fresh listener.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    rx: broadcast::Receiver<Change>,
}

impl Subscription {
    /// The topic this subscription listens on.
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Wait for the next change.
    pub async fn recv_change(&mut self) -> Option<Change> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(topic = %self.topic, skipped, "subscriber lagged, oldest changes dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next published record.
    pub async fn recv(&mut self) -> Option<Record> {
        self.recv_change().await.map(|change| change.record)
    }

    /// Take the next change if one is already buffered.
    pub fn try_recv_change(&mut self) -> Option<Change> {
        loop {
            match self.rx.try_recv() {
                Ok(change) => return Some(change),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(topic = %self.topic, skipped, "subscriber lagged, oldest changes dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a [`Stream`] of changes.
    pub fn into_stream(self) -> impl Stream<Item = Change> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv_change().await.map(|change| (change, sub))
        })
    }
}

/// A [`Subscription`] that yields records of one kind directly.
#[derive(Debug)]
pub struct TypedSubscription<E: Entity> {
    inner: Subscription,
    _kind: core::marker::PhantomData<fn() -> E>,
}

impl<E: Entity> TypedSubscription<E> {
    /// The topic this subscription listens on.
    pub const fn topic(&self) -> Topic {
        self.inner.topic
    }

    /// Wait for the next published record.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            let record = self.inner.recv().await?;
            if let Some(typed) = E::from_record(record) {
                return Some(typed);
            }
        }
    }

    /// Take the next record if one is already buffered.
    pub fn try_recv(&mut self) -> Option<E> {
        loop {
            let change = self.inner.try_recv_change()?;
            if let Some(typed) = E::from_record(change.record) {
                return Some(typed);
            }
        }
    }

    /// Convert into a [`Stream`] of typed records.
    pub fn into_stream(self) -> impl Stream<Item = E> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|record| (record, sub))
        })
    }

    /// Drop the typing and return the underlying subscription.
    pub fn into_inner(self) -> Subscription {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use eventboard_types::{Location, LocationId, User, UserId};
    use futures::StreamExt as _;

    use super::*;

    fn user(id: &str) -> User {
        User {
            id: UserId::from(id),
            username: String::from("ada"),
            email: None,
        }
    }

    const USER_CREATED: Topic = Topic::new(EntityKind::User, ChangeKind::Created);

    #[test]
    fn publish_without_listeners_is_noop() {
        let notifier = ChangeNotifier::default();
        assert_eq!(notifier.publish(USER_CREATED, user("u1").into_record()), 0);
    }

    #[tokio::test]
    async fn every_listener_receives() {
        let notifier = ChangeNotifier::default();
        let mut a = notifier.subscribe(USER_CREATED);
        let mut b = notifier.subscribe(USER_CREATED);

        assert_eq!(notifier.publish(USER_CREATED, user("u1").into_record()), 2);

        assert_eq!(a.recv().await.map(|r| r.id_str().to_owned()).as_deref(), Some("u1"));
        assert_eq!(b.recv().await.map(|r| r.id_str().to_owned()).as_deref(), Some("u1"));
    }

    #[test]
    fn no_replay_of_earlier_changes() {
        let notifier = ChangeNotifier::default();
        let _ = notifier.publish(USER_CREATED, user("early").into_record());
        let mut late = notifier.subscribe(USER_CREATED);
        assert!(late.try_recv_change().is_none());
    }

    #[test]
    fn topics_are_isolated() {
        let notifier = ChangeNotifier::default();
        let mut updated = notifier.subscribe(Topic::new(EntityKind::User, ChangeKind::Updated));
        let mut other = notifier.subscribe(Topic::new(EntityKind::Location, ChangeKind::Created));
        let _ = notifier.publish(USER_CREATED, user("u1").into_record());
        assert!(updated.try_recv_change().is_none());
        assert!(other.try_recv_change().is_none());
    }

    #[test]
    fn mismatched_record_is_dropped() {
        let notifier = ChangeNotifier::default();
        let mut sub = notifier.subscribe(USER_CREATED);
        let location = Location {
            id: LocationId::from("l1"),
            name: String::from("Hall"),
            desc: String::new(),
            lat: None,
            lng: None,
        };
        assert_eq!(notifier.publish(USER_CREATED, location.into_record()), 0);
        assert!(sub.try_recv_change().is_none());
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        let notifier = ChangeNotifier::default();
        let sub = notifier.subscribe(USER_CREATED);
        let typed = notifier.subscribe_to::<User>(ChangeKind::Created);
        assert_eq!(notifier.listener_count(USER_CREATED), 2);
        drop(sub);
        assert_eq!(notifier.listener_count(USER_CREATED), 1);
        drop(typed);
        assert_eq!(notifier.listener_count(USER_CREATED), 0);
    }

    #[test]
    fn lagging_listener_keeps_newest() {
        let notifier = ChangeNotifier::new(2);
        let mut sub = notifier.subscribe(USER_CREATED);
        for id in ["u1", "u2", "u3", "u4"] {
            let _ = notifier.publish(USER_CREATED, user(id).into_record());
        }
        let first = sub.try_recv_change().map(|c| c.record.id_str().to_owned());
        let second = sub.try_recv_change().map(|c| c.record.id_str().to_owned());
        assert_eq!(first.as_deref(), Some("u3"));
        assert_eq!(second.as_deref(), Some("u4"));
        assert!(sub.try_recv_change().is_none());
    }

    #[test]
    fn zero_capacity_is_raised() {
        assert_eq!(ChangeNotifier::new(0).capacity(), 1);
    }

    #[test]
    fn oversized_capacity_is_clamped() {
        let notifier = ChangeNotifier::new(usize::MAX);
        assert_eq!(notifier.capacity(), MAX_CHANNEL_CAPACITY);
        let topic = Topic::new(EntityKind::User, ChangeKind::Created);
        let _sub = notifier.subscribe(topic);
        assert_eq!(notifier.listener_count(topic), 1);
    }

    #[tokio::test]
    async fn typed_stream_yields_records() {
        let notifier = ChangeNotifier::default();
        let stream = notifier.subscribe_to::<User>(ChangeKind::Created).into_stream();
        let _ = notifier.publish_entity(ChangeKind::Created, user("u1"));
        let _ = notifier.publish_entity(ChangeKind::Created, user("u2"));

        let ids: Vec<String> = stream
            .take(2)
            .map(|u| u.id.into_inner())
            .collect()
            .await;
        assert_eq!(ids, vec![String::from("u1"), String::from("u2")]);
    }

    #[tokio::test]
    async fn stream_ends_when_notifier_dropped() {
        let notifier = ChangeNotifier::default();
        let mut sub = notifier.subscribe(USER_CREATED);
        drop(notifier);
        assert!(sub.recv_change().await.is_none());
    }
}
