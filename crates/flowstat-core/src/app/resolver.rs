//! Resolver - turns a query target into concrete status records.
//!
//! A resolver lives for one query evaluation.
//!
//! # Implementation details
//! - `all` returns records in provider order, fetched fresh for each item
//! - id lookups build an id -> record table per kind on first use and reuse
//!   it for later items of that kind
//! - tables are dropped with the resolver and never shared between queries

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{
    ConnectionStatus, ControllerServiceStatus, InstanceStatus, ProcessorStatus,
    RemoteProcessGroupStatus, ReportingTaskStatus, Selector, StatusError, SystemDiagnostics,
    Target, TargetKind,
};
use crate::ports::StatusProvider;

/// One resolved record, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusRecord {
    Processor(ProcessorStatus),
    Connection(ConnectionStatus),
    RemoteProcessGroup(RemoteProcessGroupStatus),
    ControllerService(ControllerServiceStatus),
    ReportingTask(ReportingTaskStatus),
    Instance(InstanceStatus),
    /// `None` when the provider has no diagnostics to offer.
    SystemDiagnostics(Option<SystemDiagnostics>),
}

impl StatusRecord {
    pub fn kind(&self) -> TargetKind {
        match self {
            StatusRecord::Processor(_) => TargetKind::Processor,
            StatusRecord::Connection(_) => TargetKind::Connection,
            StatusRecord::RemoteProcessGroup(_) => TargetKind::RemoteProcessGroup,
            StatusRecord::ControllerService(_) => TargetKind::ControllerService,
            StatusRecord::ReportingTask(_) => TargetKind::ReportingTask,
            StatusRecord::Instance(_) => TargetKind::Instance,
            StatusRecord::SystemDiagnostics(_) => TargetKind::SystemDiagnostics,
        }
    }

    /// Stable id of the record. Singletons have none.
    pub fn id(&self) -> Option<&str> {
        match self {
            StatusRecord::Processor(s) => Some(&s.id),
            StatusRecord::Connection(s) => Some(&s.id),
            StatusRecord::RemoteProcessGroup(s) => Some(&s.id),
            StatusRecord::ControllerService(s) => Some(&s.id),
            StatusRecord::ReportingTask(s) => Some(&s.id),
            StatusRecord::Instance(_) | StatusRecord::SystemDiagnostics(_) => None,
        }
    }
}

pub struct Resolver<'a> {
    provider: &'a dyn StatusProvider,
    lookup: HashMap<TargetKind, HashMap<String, StatusRecord>>,
}

impl<'a> Resolver<'a> {
    pub fn new(provider: &'a dyn StatusProvider) -> Self {
        Self {
            provider,
            lookup: HashMap::new(),
        }
    }

    pub async fn resolve_target(&mut self, target: &Target) -> Result<Vec<StatusRecord>, StatusError> {
        match target {
            Target::Processor(selector)
            | Target::Connection(selector)
            | Target::RemoteProcessGroup(selector) => self.resolve(target.kind(), selector).await,
            _ => self.resolve(target.kind(), &Selector::All).await,
        }
    }

    /// Resolve `selector` against every record of `kind`.
    ///
    /// - `All` returns the records in provider order (possibly none).
    /// - `Id` returns exactly one record or fails with `NotFound`.
    /// - Instance and system diagnostics always yield their single record and
    ///   ignore the selector.
    pub async fn resolve(
        &mut self,
        kind: TargetKind,
        selector: &Selector,
    ) -> Result<Vec<StatusRecord>, StatusError> {
        match kind {
            TargetKind::Instance => {
                let instance = self.provider.instance_status().await?;
                return Ok(vec![StatusRecord::Instance(instance)]);
            }
            TargetKind::SystemDiagnostics => {
                let diagnostics = self.provider.system_diagnostics().await?;
                return Ok(vec![StatusRecord::SystemDiagnostics(diagnostics)]);
            }
            _ => {}
        }

        let id = match selector {
            Selector::All => return self.fetch_all(kind).await,
            Selector::Id(id) => id,
        };

        if !self.lookup.contains_key(&kind) {
            let records = self.fetch_all(kind).await?;
            let table: HashMap<String, StatusRecord> = records
                .into_iter()
                .filter_map(|r| r.id().map(str::to_string).map(|id| (id, r)))
                .collect();
            debug!(%kind, entries = table.len(), "built status lookup table");
            self.lookup.insert(kind, table);
        }

        self.lookup
            .get(&kind)
            .and_then(|table| table.get(id))
            .cloned()
            .map(|record| vec![record])
            .ok_or_else(|| StatusError::NotFound {
                kind,
                id: id.clone(),
            })
    }

    async fn fetch_all(&self, kind: TargetKind) -> Result<Vec<StatusRecord>, StatusError> {
        let records = match kind {
            TargetKind::Processor => self
                .provider
                .processor_statuses()
                .await?
                .into_iter()
                .map(StatusRecord::Processor)
                .collect(),
            TargetKind::Connection => self
                .provider
                .connection_statuses()
                .await?
                .into_iter()
                .map(StatusRecord::Connection)
                .collect(),
            TargetKind::RemoteProcessGroup => self
                .provider
                .remote_process_group_statuses()
                .await?
                .into_iter()
                .map(StatusRecord::RemoteProcessGroup)
                .collect(),
            TargetKind::ControllerService => self
                .provider
                .controller_services()
                .await?
                .into_iter()
                .map(StatusRecord::ControllerService)
                .collect(),
            TargetKind::ReportingTask => self
                .provider
                .reporting_tasks()
                .await?
                .into_iter()
                .map(StatusRecord::ReportingTask)
                .collect(),
            TargetKind::Instance => vec![StatusRecord::Instance(
                self.provider.instance_status().await?,
            )],
            TargetKind::SystemDiagnostics => vec![StatusRecord::SystemDiagnostics(
                self.provider.system_diagnostics().await?,
            )],
        };
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{InMemoryStatusProvider, StatusSnapshot};

    fn processor(id: &str) -> ProcessorStatus {
        ProcessorStatus {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn provider() -> InMemoryStatusProvider {
        InMemoryStatusProvider::new(
            StatusSnapshot::default()
                .with_processor(processor("P1"))
                .with_processor(processor("P2"))
                .with_connection(ConnectionStatus {
                    id: "C1".to_string(),
                    ..Default::default()
                }),
        )
    }

    #[tokio::test]
    async fn all_keeps_provider_order() {
        let provider = provider();
        let mut resolver = Resolver::new(&provider);
        let records = resolver
            .resolve(TargetKind::Processor, &Selector::All)
            .await
            .unwrap();
        let ids: Vec<_> = records.iter().filter_map(StatusRecord::id).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[tokio::test]
    async fn id_lookups_share_one_resolver() {
        let provider = provider();
        let mut resolver = Resolver::new(&provider);

        let p2 = resolver
            .resolve(TargetKind::Processor, &Selector::Id("P2".to_string()))
            .await
            .unwrap();
        assert_eq!(p2[0].id(), Some("P2"));

        let p1 = resolver
            .resolve(TargetKind::Processor, &Selector::Id("P1".to_string()))
            .await
            .unwrap();
        assert_eq!(p1[0].id(), Some("P1"));

        let c1 = resolver
            .resolve(TargetKind::Connection, &Selector::Id("C1".to_string()))
            .await
            .unwrap();
        assert!(matches!(c1.as_slice(), [StatusRecord::Connection(c)] if c.id == "C1"));
    }

    #[tokio::test]
    async fn missing_id_is_not_found() {
        let provider = provider();
        let mut resolver = Resolver::new(&provider);
        let err = resolver
            .resolve(TargetKind::Processor, &Selector::Id("doesNotExist".to_string()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::NotFound {
                kind: TargetKind::Processor,
                id: "doesNotExist".to_string()
            }
        );
    }

    #[tokio::test]
    async fn singletons_resolve_without_selector() {
        let provider = provider();
        let mut resolver = Resolver::new(&provider);

        let instance = resolver.resolve_target(&Target::Instance).await.unwrap();
        assert!(matches!(instance.as_slice(), [StatusRecord::Instance(_)]));

        let diagnostics = resolver
            .resolve_target(&Target::SystemDiagnostics)
            .await
            .unwrap();
        assert!(matches!(
            diagnostics.as_slice(),
            [StatusRecord::SystemDiagnostics(None)]
        ));
    }
}
