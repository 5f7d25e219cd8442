//! Persistence of analysis results.
//!
//! Results are keyed by review id with upsert semantics: analysing the same
//! review twice leaves only the latest result. Concurrent writers for one id
//! race and the last write wins.

pub mod memory;
pub mod supabase;

pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;

use crate::schema::AnalysisResult;
use crate::types::InsightsResult;

/// Page size for `list` when the caller gives none
pub const DEFAULT_LIST_LIMIT: usize = 100;

#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Insert `record`, replacing any earlier result for the same review id
    async fn upsert(&self, record: &AnalysisResult) -> InsightsResult<AnalysisResult>;

    /// Fetch the stored result for `review_id`
    async fn get(&self, review_id: &str) -> InsightsResult<Option<AnalysisResult>>;

    /// Up to `limit` results, newest review date first
    async fn list(&self, limit: usize) -> InsightsResult<Vec<AnalysisResult>>;

    /// Name used in logs
    fn name(&self) -> &str;
}
