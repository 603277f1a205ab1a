//! Facet renderer - formats one status record, facet by facet.
//!
//! Every (kind, facet) pair maps to a fixed fragment template.
//!
//! # Key points
//! - pairs a kind does not support render a "not a valid request" fragment
//!   instead of an error
//! - bulletins and validation issues are fetched only when a requested facet
//!   needs them, and at most once per record
//!
//! # Implementation details
//! - timestamps go through `write!` so a bad strftime layout falls back to
//!   RFC 3339 instead of panicking

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::config::ReporterConfig;
use super::resolver::StatusRecord;
use crate::domain::{
    Bulletin, ConnectionStatus, ControllerServiceStatus, Facet, InstanceStatus, ProcessorStatus,
    RemoteProcessGroupStatus, ReportingTaskStatus, StatusError, StorageUsage, SystemDiagnostics,
    ValidationIssue,
};
use crate::ports::StatusProvider;

/// Side data for one record, filled on demand.
#[derive(Default)]
struct SideData {
    bulletins: Option<Vec<Bulletin>>,
    validation_issues: Option<Vec<ValidationIssue>>,
}

pub struct FacetRenderer<'a> {
    provider: &'a dyn StatusProvider,
    config: &'a ReporterConfig,
}

impl<'a> FacetRenderer<'a> {
    pub fn new(provider: &'a dyn StatusProvider, config: &'a ReporterConfig) -> Self {
        Self { provider, config }
    }

    /// Render a single facet fragment for `record`.
    pub async fn render(&self, record: &StatusRecord, facet: &Facet) -> Result<String, StatusError> {
        let mut side = SideData::default();
        self.render_facet(record, facet, &mut side).await
    }

    /// Render the record header followed by every facet, in requested order.
    pub async fn render_record(
        &self,
        record: &StatusRecord,
        facets: &[Facet],
    ) -> Result<String, StatusError> {
        let mut out = header(record);
        if let StatusRecord::SystemDiagnostics(None) = record {
            warn!("system diagnostics requested but none are available");
            out.push_str("Unable to get system diagnostics");
            return Ok(out);
        }

        let mut side = SideData::default();
        for facet in facets {
            let fragment = self.render_facet(record, facet, &mut side).await?;
            out.push_str(&fragment);
        }
        Ok(out)
    }

    async fn render_facet(
        &self,
        record: &StatusRecord,
        facet: &Facet,
        side: &mut SideData,
    ) -> Result<String, StatusError> {
        let fragment = match (record, facet) {
            (StatusRecord::Processor(p), Facet::Health) => {
                let has_bulletins = !self.bulletins(record, side).await?.is_empty();
                let issues = self.validation_issues(&p.id, side).await?;
                processor_health(p, has_bulletins, issues)
            }
            (StatusRecord::Processor(p), Facet::Stats) => processor_stats(p),

            (StatusRecord::Connection(c), Facet::Health) => connection_health(c),
            (StatusRecord::Connection(c), Facet::Stats) => connection_stats(c),

            (StatusRecord::RemoteProcessGroup(g), Facet::Health) => {
                let has_bulletins = !self.bulletins(record, side).await?.is_empty();
                remote_group_health(g, has_bulletins)
            }
            (StatusRecord::RemoteProcessGroup(g), Facet::Stats) => remote_group_stats(g),
            (StatusRecord::RemoteProcessGroup(g), Facet::AuthorizationIssues) => {
                authorization_issues(g)
            }
            (StatusRecord::RemoteProcessGroup(g), Facet::InputPorts) => input_ports(g),

            (StatusRecord::ControllerService(s), Facet::Health) => {
                let has_bulletins = !self.bulletins(record, side).await?.is_empty();
                let issues = self.validation_issues(&s.id, side).await?;
                controller_service_health(s, has_bulletins, issues)
            }

            (StatusRecord::ReportingTask(t), Facet::Health) => {
                let has_bulletins = !self.bulletins(record, side).await?.is_empty();
                let issues = self.validation_issues(&t.id, side).await?;
                reporting_task_health(t, has_bulletins, issues)
            }

            (StatusRecord::Instance(i), Facet::Health) => {
                let has_bulletins = !self.bulletins(record, side).await?.is_empty();
                instance_health(i, has_bulletins)
            }
            (StatusRecord::Instance(i), Facet::Stats) => instance_stats(i),

            (
                StatusRecord::Processor(_)
                | StatusRecord::RemoteProcessGroup(_)
                | StatusRecord::ControllerService(_)
                | StatusRecord::ReportingTask(_)
                | StatusRecord::Instance(_),
                Facet::Bulletins,
            ) => {
                let bulletins = self.bulletins(record, side).await?;
                bulletins_fragment(bulletins, &self.config.bulletin_timestamp_format)
            }

            (StatusRecord::SystemDiagnostics(Some(d)), Facet::Heap) => heap(d),
            (StatusRecord::SystemDiagnostics(Some(d)), Facet::ProcessorStats) => {
                diagnostics_processor_stats(d)
            }
            (StatusRecord::SystemDiagnostics(Some(d)), Facet::ContentRepositoryUsage) => {
                content_repository_usage(d)
            }
            (StatusRecord::SystemDiagnostics(Some(d)), Facet::FlowFileRepositoryUsage) => {
                format!(
                    "<FlowFile Repository Usage {{{}}}>",
                    storage_usage(&d.flow_file_repository)
                )
            }
            (StatusRecord::SystemDiagnostics(Some(d)), Facet::GarbageCollection) => {
                garbage_collection(d)
            }
            (StatusRecord::SystemDiagnostics(None), _) => {
                "Unable to get system diagnostics".to_string()
            }

            _ => not_applicable(record, facet),
        };
        Ok(fragment)
    }

    async fn bulletins<'s>(
        &self,
        record: &StatusRecord,
        side: &'s mut SideData,
    ) -> Result<&'s [Bulletin], StatusError> {
        if side.bulletins.is_none() {
            let bulletins = match record.id() {
                Some(id) => self.provider.bulletins(id).await?,
                None => self.provider.controller_bulletins().await?,
            };
            side.bulletins = Some(bulletins);
        }
        Ok(side.bulletins.as_deref().unwrap_or_default())
    }

    async fn validation_issues<'s>(
        &self,
        id: &str,
        side: &'s mut SideData,
    ) -> Result<&'s [ValidationIssue], StatusError> {
        if side.validation_issues.is_none() {
            side.validation_issues = Some(self.provider.validation_issues(id).await?);
        }
        Ok(side.validation_issues.as_deref().unwrap_or_default())
    }
}

fn header(record: &StatusRecord) -> String {
    match record {
        StatusRecord::Processor(p) => format!("Processor '{}':", p.id),
        StatusRecord::Connection(c) => format!("Connection '{}':", c.id),
        StatusRecord::RemoteProcessGroup(g) => format!("Remote Processing Group '{}':", g.id),
        StatusRecord::ControllerService(s) => format!("Controller Service '{}':", s.id),
        StatusRecord::ReportingTask(t) => format!("Reporting Task '{}':", t.id),
        StatusRecord::Instance(_) => "Instance :".to_string(),
        StatusRecord::SystemDiagnostics(_) => "System Diagnostics :".to_string(),
    }
}

fn not_applicable(record: &StatusRecord, facet: &Facet) -> String {
    let kind = record.kind();
    warn!(
        %kind,
        id = record.id().unwrap_or_default(),
        facet = facet.keyword(),
        "facet is not available for this target kind"
    );
    let err = StatusError::UnsupportedFacet {
        kind,
        facet: facet.keyword().to_string(),
    };
    format!("<{} {{{err}}}>", facet.title())
}

/// `, Validation Error(s):[...]` for invalid results, or nothing at all.
fn validation_suffix(issues: &[ValidationIssue]) -> String {
    let invalid: Vec<String> = issues
        .iter()
        .filter(|issue| !issue.valid)
        .map(|issue| {
            format!(
                "'{}' is invalid with input '{}' because '{}'",
                issue.subject, issue.input, issue.explanation
            )
        })
        .collect();
    if invalid.is_empty() {
        String::new()
    } else {
        format!(", Validation Error(s):[{}]", invalid.join(", "))
    }
}

fn bulletins_fragment(bulletins: &[Bulletin], timestamp_format: &str) -> String {
    if bulletins.is_empty() {
        return "<Bulletins 'No bulletins'>".to_string();
    }
    let entries: Vec<String> = bulletins
        .iter()
        .map(|b| {
            format!(
                "{{'{}':'{}'}}",
                format_timestamp(&b.timestamp, timestamp_format),
                b.message
            )
        })
        .collect();
    format!("<Bulletins {}>", entries.join(", "))
}

/// Falls back to RFC 3339 when the configured layout is not a valid strftime string.
fn format_timestamp(timestamp: &DateTime<Utc>, layout: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", timestamp.format(layout)).is_err() {
        return timestamp.to_rfc3339();
    }
    out
}

fn processor_health(p: &ProcessorStatus, has_bulletins: bool, issues: &[ValidationIssue]) -> String {
    format!(
        "<Health {{Run Status:{}, Has Bulletin(s):{}{}}}>",
        p.run_status,
        has_bulletins,
        validation_suffix(issues)
    )
}

fn processor_stats(p: &ProcessorStatus) -> String {
    format!(
        "<Stats {{Active Threads:{}, FlowFiles Received:{}, Bytes Read:{}, Bytes Written:{}, \
         FlowFiles Out:{}, Tasks:{}, Processing Nanos:{}}}>",
        p.active_thread_count,
        p.flow_files_received,
        p.bytes_read,
        p.bytes_written,
        p.flow_files_sent,
        p.invocations,
        p.processing_nanos
    )
}

fn connection_health(c: &ConnectionStatus) -> String {
    format!(
        "<Health {{Queued Count:{}, Queued Size:{}}}>",
        c.queued_count, c.queued_bytes
    )
}

fn connection_stats(c: &ConnectionStatus) -> String {
    format!(
        "<Stats {{Input Count:{}, Input Bytes:{}, Output Count:{}, Output Bytes:{}}}>",
        c.input_count, c.input_bytes, c.output_count, c.output_bytes
    )
}

fn remote_group_health(g: &RemoteProcessGroupStatus, has_bulletins: bool) -> String {
    format!(
        "<Health {{Transmission Status:{}, Has Bulletin(s):{}, Has Authorization Issue(s):{}, \
         Active Port Count:{}, Inactive Port Count:{}}}>",
        g.transmission_status,
        has_bulletins,
        !g.authorization_issues.is_empty(),
        g.active_remote_port_count,
        g.inactive_remote_port_count
    )
}

fn remote_group_stats(g: &RemoteProcessGroupStatus) -> String {
    format!(
        "<Stats {{Active Threads:{}, Sent Count:{}, Sent Content Size:{}}}>",
        g.active_thread_count, g.sent_count, g.sent_content_size
    )
}

fn authorization_issues(g: &RemoteProcessGroupStatus) -> String {
    let quoted: Vec<String> = g
        .authorization_issues
        .iter()
        .map(|issue| format!("'{issue}'"))
        .collect();
    format!("<Authorization Issue(s) {}>", quoted.join(", "))
}

fn input_ports(g: &RemoteProcessGroupStatus) -> String {
    let ports: Vec<String> = g
        .input_ports
        .iter()
        .map(|port| format!("{}:'{}'", port.name, port.target_description()))
        .collect();
    format!("<Ports {{{}}}>", ports.join(", "))
}

fn controller_service_health(
    s: &ControllerServiceStatus,
    has_bulletins: bool,
    issues: &[ValidationIssue],
) -> String {
    format!(
        "<Health {{State:{}, Has Bulletin(s):{}{}}}>",
        s.state,
        has_bulletins,
        validation_suffix(issues)
    )
}

fn reporting_task_health(
    t: &ReportingTaskStatus,
    has_bulletins: bool,
    issues: &[ValidationIssue],
) -> String {
    format!(
        "<Health {{Scheduled State:{}, Has Bulletin(s):{}, Active Threads:{}{}}}>",
        t.scheduled_state,
        has_bulletins,
        t.active_thread_count,
        validation_suffix(issues)
    )
}

fn instance_health(i: &InstanceStatus, has_bulletins: bool) -> String {
    format!(
        "<Health {{Queued Count:{}, Queued Content Size:{}, Has Bulletin(s):{}, Active Threads:{}}}>",
        i.queued_count, i.queued_content_size, has_bulletins, i.active_thread_count
    )
}

fn instance_stats(i: &InstanceStatus) -> String {
    format!(
        "<Stats {{Bytes Read:{}, Bytes Written:{}, Bytes Sent:{}, FlowFiles Sent:{}, \
         Bytes Transferred:{}, FlowFiles Transferred:{}, Bytes Received:{}, FlowFiles Received:{}}}>",
        i.bytes_read,
        i.bytes_written,
        i.bytes_sent,
        i.flow_files_sent,
        i.bytes_transferred,
        i.flow_files_transferred,
        i.bytes_received,
        i.flow_files_received
    )
}

fn heap(d: &SystemDiagnostics) -> String {
    let h = &d.heap;
    format!(
        "<Heap {{Total Heap:{}, Max Heap:{}, Free Heap:{}, Used Heap:{}, Heap Utilization:{}, \
         Total NonHeap:{}, Max NonHeap:{}, Free NonHeap:{}, Used NonHeap:{}, NonHeap Utilization:{}}}>",
        h.total_heap,
        h.max_heap,
        h.free_heap,
        h.used_heap,
        h.heap_utilization,
        h.total_non_heap,
        h.max_non_heap,
        h.free_non_heap,
        h.used_non_heap,
        h.non_heap_utilization
    )
}

fn diagnostics_processor_stats(d: &SystemDiagnostics) -> String {
    // Debug keeps the fractional part on whole numbers (1.0, not 1).
    format!(
        "<Processor Stats {{Processor Load Average:{:?}, Available Processors:{}}}>",
        d.processor_load_average, d.available_processors
    )
}

fn storage_usage(u: &StorageUsage) -> String {
    format!(
        "Free Space:{}, Total Space:{}, Disk Utilization:{}, Used Space:{}",
        u.free_space, u.total_space, u.disk_utilization, u.used_space
    )
}

fn content_repository_usage(d: &SystemDiagnostics) -> String {
    let repos: Vec<String> = d
        .content_repositories
        .iter()
        .map(|repo| format!("'{}':[{}]", repo.identifier, storage_usage(repo)))
        .collect();
    format!("<Content Repository Usage {{{}}}>", repos.join(", "))
}

fn garbage_collection(d: &SystemDiagnostics) -> String {
    let collectors: Vec<String> = d
        .garbage_collection
        .iter()
        .map(|gc| {
            format!(
                "'{}':[Collection Count:{}, Collection Time:{}]",
                gc.name, gc.collection_count, gc.collection_time
            )
        })
        .collect();
    format!("<Garbage Collection {{{}}}>", collectors.join(", "))
}
