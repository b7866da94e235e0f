//! Change notification payload.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::enums::Topic;
use crate::record::Record;

/// One published mutation: the topic it was published on, the affected
/// record, and when it was published.
///
/// For `Created` and `Updated` topics the record is the stored state right
/// after the mutation; for `Deleted` it is the record that was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    /// The topic the change was published on.
    pub topic: Topic,
    /// The affected record.
    pub record: Record,
    /// Publication time.
    pub published_at: DateTime<Utc>,
}

impl Change {
    /// Stamp a record with the current time for publication on `topic`.
    pub fn now(topic: Topic, record: Record) -> Self {
        Self {
            topic,
            record,
            published_at: Utc::now(),
        }
    }
}
