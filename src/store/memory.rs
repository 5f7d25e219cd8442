// In-process store backed by a concurrent map

use async_trait::async_trait;
use dashmap::DashMap;
use std::cmp::Reverse;

use crate::schema::AnalysisResult;
use crate::store::ReviewStore;
use crate::types::InsightsResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, AnalysisResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn upsert(&self, record: &AnalysisResult) -> InsightsResult<AnalysisResult> {
        self.records.insert(record.review_id.clone(), record.clone());
        tracing::info!(review_id = %record.review_id, "Saved analysis to memory store");
        Ok(record.clone())
    }

    async fn get(&self, review_id: &str) -> InsightsResult<Option<AnalysisResult>> {
        Ok(self.records.get(review_id).map(|entry| entry.value().clone()))
    }

    async fn list(&self, limit: usize) -> InsightsResult<Vec<AnalysisResult>> {
        let mut records: Vec<AnalysisResult> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // Ties broken by id so listings are stable
        records.sort_by(|a, b| {
            Reverse(a.review_date)
                .cmp(&Reverse(b.review_date))
                .then_with(|| a.review_id.cmp(&b.review_id))
        });
        records.truncate(limit);
        Ok(records)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
