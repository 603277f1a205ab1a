//! InMemoryStatusProvider - a StatusProvider over a status snapshot.
//!
//! Used by the CLI (snapshot loaded from JSON) and by tests.
//!
//! # Key points
//! - `RwLock` around the whole snapshot, swapped with `replace`
//! - every read clones what it returns, so a query sees the data as it was
//!   at the moment of each call
//!
//! # Implementation details
//! - component bulletins match `source_id` exactly; controller bulletins
//!   are the ones without a source
//! - a poisoned lock surfaces as `ProviderError::Unavailable`

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Bulletin, ConnectionStatus, ControllerServiceStatus, InstanceStatus, ProcessorStatus,
    ProviderError, RemoteProcessGroupStatus, ReportingTaskStatus, SystemDiagnostics,
    ValidationIssue,
};
use crate::ports::StatusProvider;

/// Everything a provider can answer, in one serializable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub processors: Vec<ProcessorStatus>,
    pub connections: Vec<ConnectionStatus>,
    pub remote_process_groups: Vec<RemoteProcessGroupStatus>,
    pub controller_services: Vec<ControllerServiceStatus>,
    pub reporting_tasks: Vec<ReportingTaskStatus>,
    pub instance: InstanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_diagnostics: Option<SystemDiagnostics>,
    /// Component bulletins carry a `source_id`; controller bulletins do not.
    pub bulletins: Vec<Bulletin>,
    /// Validation results keyed by component id.
    pub validation_issues: HashMap<String, Vec<ValidationIssue>>,
}

impl StatusSnapshot {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_processor(mut self, status: ProcessorStatus) -> Self {
        self.processors.push(status);
        self
    }

    pub fn with_connection(mut self, status: ConnectionStatus) -> Self {
        self.connections.push(status);
        self
    }

    pub fn with_remote_process_group(mut self, status: RemoteProcessGroupStatus) -> Self {
        self.remote_process_groups.push(status);
        self
    }

    pub fn with_controller_service(mut self, status: ControllerServiceStatus) -> Self {
        self.controller_services.push(status);
        self
    }

    pub fn with_reporting_task(mut self, status: ReportingTaskStatus) -> Self {
        self.reporting_tasks.push(status);
        self
    }

    pub fn with_instance(mut self, status: InstanceStatus) -> Self {
        self.instance = status;
        self
    }

    pub fn with_system_diagnostics(mut self, diagnostics: SystemDiagnostics) -> Self {
        self.system_diagnostics = Some(diagnostics);
        self
    }

    pub fn with_bulletin(mut self, bulletin: Bulletin) -> Self {
        self.bulletins.push(bulletin);
        self
    }

    pub fn with_validation_issue(mut self, id: impl Into<String>, issue: ValidationIssue) -> Self {
        self.validation_issues.entry(id.into()).or_default().push(issue);
        self
    }
}

pub struct InMemoryStatusProvider {
    snapshot: RwLock<StatusSnapshot>,
}

impl InMemoryStatusProvider {
    pub fn new(snapshot: StatusSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Swap in fresh status data. Queries already running keep what they read.
    pub fn replace(&self, snapshot: StatusSnapshot) -> Result<(), ProviderError> {
        let mut guard = self
            .snapshot
            .write()
            .map_err(|e| ProviderError::Unavailable(format!("snapshot lock poisoned: {e}")))?;
        *guard = snapshot;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StatusSnapshot>, ProviderError> {
        self.snapshot
            .read()
            .map_err(|e| ProviderError::Unavailable(format!("snapshot lock poisoned: {e}")))
    }
}

impl Default for InMemoryStatusProvider {
    fn default() -> Self {
        Self::new(StatusSnapshot::default())
    }
}

#[async_trait]
impl StatusProvider for InMemoryStatusProvider {
    async fn processor_statuses(&self) -> Result<Vec<ProcessorStatus>, ProviderError> {
        Ok(self.read()?.processors.clone())
    }

    async fn connection_statuses(&self) -> Result<Vec<ConnectionStatus>, ProviderError> {
        Ok(self.read()?.connections.clone())
    }

    async fn remote_process_group_statuses(
        &self,
    ) -> Result<Vec<RemoteProcessGroupStatus>, ProviderError> {
        Ok(self.read()?.remote_process_groups.clone())
    }

    async fn controller_services(&self) -> Result<Vec<ControllerServiceStatus>, ProviderError> {
        Ok(self.read()?.controller_services.clone())
    }

    async fn reporting_tasks(&self) -> Result<Vec<ReportingTaskStatus>, ProviderError> {
        Ok(self.read()?.reporting_tasks.clone())
    }

    async fn instance_status(&self) -> Result<InstanceStatus, ProviderError> {
        Ok(self.read()?.instance.clone())
    }

    async fn system_diagnostics(&self) -> Result<Option<SystemDiagnostics>, ProviderError> {
        Ok(self.read()?.system_diagnostics.clone())
    }

    async fn bulletins(&self, source_id: &str) -> Result<Vec<Bulletin>, ProviderError> {
        Ok(self
            .read()?
            .bulletins
            .iter()
            .filter(|b| b.source_id.as_deref() == Some(source_id))
            .cloned()
            .collect())
    }

    async fn controller_bulletins(&self) -> Result<Vec<Bulletin>, ProviderError> {
        Ok(self
            .read()?
            .bulletins
            .iter()
            .filter(|b| b.source_id.is_none())
            .cloned()
            .collect())
    }

    async fn validation_issues(&self, id: &str) -> Result<Vec<ValidationIssue>, ProviderError> {
        Ok(self
            .read()?
            .validation_issues
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts() -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_464_019_245, 0).unwrap()
    }

    #[tokio::test]
    async fn bulletins_are_filtered_by_source() {
        let provider = InMemoryStatusProvider::new(
            StatusSnapshot::default()
                .with_bulletin(Bulletin::new("P1", ts(), "one"))
                .with_bulletin(Bulletin::new("P2", ts(), "two"))
                .with_bulletin(Bulletin::controller(ts(), "root")),
        );

        let p1 = provider.bulletins("P1").await.unwrap();
        assert_eq!(p1.len(), 1);
        assert_eq!(p1[0].message, "one");

        let root = provider.controller_bulletins().await.unwrap();
        assert_eq!(root.len(), 1);
        assert_eq!(root[0].message, "root");

        assert!(provider.bulletins("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn validation_issues_default_to_empty() {
        let provider = InMemoryStatusProvider::new(
            StatusSnapshot::default()
                .with_validation_issue("CS1", ValidationIssue::invalid("s", "i", "e")),
        );
        assert_eq!(provider.validation_issues("CS1").await.unwrap().len(), 1);
        assert!(provider.validation_issues("CS2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn replace_does_not_touch_values_already_read() {
        let provider = InMemoryStatusProvider::new(StatusSnapshot::default().with_processor(
            ProcessorStatus {
                id: "P1".to_string(),
                ..Default::default()
            },
        ));

        let before = provider.processor_statuses().await.unwrap();
        provider.replace(StatusSnapshot::default()).unwrap();

        assert_eq!(before.len(), 1);
        assert!(provider.processor_statuses().await.unwrap().is_empty());
    }

    #[test]
    fn snapshot_from_sparse_json() {
        let json = r#"
        {
          "processors": [ { "id": "P1", "run_status": "Running" } ],
          "bulletins": [
            { "source_id": "P1", "timestamp": "2016-05-23T16:00:45Z", "message": "hi" }
          ]
        }"#;
        let snapshot = StatusSnapshot::from_json(json).expect("deserialize");
        assert_eq!(snapshot.processors[0].id, "P1");
        assert!(snapshot.connections.is_empty());
        assert!(snapshot.system_diagnostics.is_none());
        assert_eq!(snapshot.bulletins[0].timestamp, ts());
    }
}
