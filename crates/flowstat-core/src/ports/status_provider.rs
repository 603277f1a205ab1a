//! StatusProvider port - the live status data the engine reads.
//!
//! The surrounding system owns and mutates this data. The engine only asks
//! for point-in-time copies and never writes anything back.
//!
//! # Implementations
//! - **InMemoryStatusProvider**: snapshot held in memory (CLI, tests)

use async_trait::async_trait;

use crate::domain::{
    Bulletin, ConnectionStatus, ControllerServiceStatus, InstanceStatus, ProcessorStatus,
    ProviderError, RemoteProcessGroupStatus, ReportingTaskStatus, SystemDiagnostics,
    ValidationIssue,
};

/// Read-only source of component and system status.
///
/// # Contract
/// - Each call returns a snapshot that is consistent at the instant of the
///   call; later changes must not show through the returned values.
/// - Calls may be slow. The engine awaits them one at a time and never retries.
/// - Collection order is the provider's own and is reproduced in reports.
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn processor_statuses(&self) -> Result<Vec<ProcessorStatus>, ProviderError>;

    async fn connection_statuses(&self) -> Result<Vec<ConnectionStatus>, ProviderError>;

    async fn remote_process_group_statuses(
        &self,
    ) -> Result<Vec<RemoteProcessGroupStatus>, ProviderError>;

    async fn controller_services(&self) -> Result<Vec<ControllerServiceStatus>, ProviderError>;

    async fn reporting_tasks(&self) -> Result<Vec<ReportingTaskStatus>, ProviderError>;

    async fn instance_status(&self) -> Result<InstanceStatus, ProviderError>;

    /// `None` when diagnostics are not available on this host.
    async fn system_diagnostics(&self) -> Result<Option<SystemDiagnostics>, ProviderError>;

    /// Bulletins emitted by one component.
    async fn bulletins(&self, source_id: &str) -> Result<Vec<Bulletin>, ProviderError>;

    /// Controller-level bulletins (not filtered by source).
    async fn controller_bulletins(&self) -> Result<Vec<Bulletin>, ProviderError>;

    /// Validation results for a processor, controller service or reporting task.
    async fn validation_issues(&self, id: &str) -> Result<Vec<ValidationIssue>, ProviderError>;
}
