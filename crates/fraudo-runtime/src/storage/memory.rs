//! In-memory event repository

use super::{AggregateQuery, EventRepository, HistoricalEvent};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Event repository kept in process memory
///
/// Suitable for tests and embedders that do not need history to survive a
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<HistoricalEvent>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<HistoricalEvent>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Copy of every stored event
    pub async fn events(&self) -> Vec<HistoricalEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: HistoricalEvent) -> Result<()> {
        self.events.write().await.push(event);
        Ok(())
    }

    async fn insert_batch(&self, events: Vec<HistoricalEvent>) -> Result<()> {
        // Single write guard: readers never see a partial batch
        self.events.write().await.extend(events);
        Ok(())
    }

    async fn aggregate(&self, query: AggregateQuery) -> Result<i64> {
        let events = self.events.read().await;
        let value = query.apply(events.iter());
        tracing::debug!("{:?} on {}={} -> {}", query.kind, query.field.name, query.field.value, value);
        Ok(value)
    }
}
