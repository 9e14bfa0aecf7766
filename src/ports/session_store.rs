//! SessionStore port - durable write side for completed sessions.

use async_trait::async_trait;

use crate::domain::attendance::CompletedSession;
use crate::domain::foundation::DomainError;

/// Persists accepted attendance sessions.
///
/// One call writes exactly one row. Implementations own their own
/// concurrency discipline (pooling, serialization); callers may invoke
/// `insert_session` from many tasks at once.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert one completed session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert_session(&self, session: &CompletedSession) -> Result<(), DomainError>;
}
