//! Service registry repository trait.

use crate::error::StoreResult;
use crate::models::ServiceRow;
use async_trait::async_trait;
use parapet_core::Method;

/// Repository for the service registry.
///
/// Services are created implicitly by value writes that reference an
/// unknown server name; this trait only exposes reads and the explicit,
/// method-gated removal path.
#[async_trait]
pub trait ServiceRepo: Send + Sync {
    /// List all registered services.
    async fn list_services(&self) -> StoreResult<Vec<ServiceRow>>;

    /// Get one service by id.
    async fn get_service(&self, id: &str) -> StoreResult<Option<ServiceRow>>;

    /// Remove a service and everything scoped to it (values, custom
    /// configs, job cache entries).
    ///
    /// Fails with `NotFound` for an unknown id and `MethodConflict` when
    /// `method` lacks authority over the owning method.
    async fn remove_service(&self, id: &str, method: Method) -> StoreResult<()>;
}
