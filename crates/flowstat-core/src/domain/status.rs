//! Status records handed to the engine by a `StatusProvider`.
//!
//! These are plain data holders. The engine only reads them; the surrounding
//! system owns and refreshes the live values. Every record deserializes with
//! defaults for missing fields so snapshots can be written sparsely.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run state of a processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    #[default]
    Stopped,
    Validating,
    Disabled,
    Invalid,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Running => "Running",
            RunStatus::Stopped => "Stopped",
            RunStatus::Validating => "Validating",
            RunStatus::Disabled => "Disabled",
            RunStatus::Invalid => "Invalid",
        };
        f.write_str(s)
    }
}

/// Whether a remote process group is currently sending data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransmissionStatus {
    Transmitting,
    #[default]
    NotTransmitting,
}

impl fmt::Display for TransmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransmissionStatus::Transmitting => f.write_str("Transmitting"),
            TransmissionStatus::NotTransmitting => f.write_str("NotTransmitting"),
        }
    }
}

/// Controller service lifecycle state.
///
/// Serialized and displayed as SCREAMING_SNAKE_CASE (ENABLED / DISABLED / ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControllerServiceState {
    Enabled,
    Enabling,
    #[default]
    Disabled,
    Disabling,
}

impl fmt::Display for ControllerServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ControllerServiceState::Enabled => "ENABLED",
            ControllerServiceState::Enabling => "ENABLING",
            ControllerServiceState::Disabled => "DISABLED",
            ControllerServiceState::Disabling => "DISABLING",
        };
        f.write_str(s)
    }
}

/// Scheduling state of a reporting task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduledState {
    Running,
    #[default]
    Stopped,
    Disabled,
}

impl fmt::Display for ScheduledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScheduledState::Running => "RUNNING",
            ScheduledState::Stopped => "STOPPED",
            ScheduledState::Disabled => "DISABLED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorStatus {
    pub id: String,
    pub name: String,
    pub run_status: RunStatus,
    pub active_thread_count: u32,
    pub flow_files_received: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub flow_files_sent: u64,
    /// Number of tasks (invocations) run in the current window.
    pub invocations: u64,
    pub processing_nanos: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionStatus {
    pub id: String,
    pub name: String,
    pub queued_count: u64,
    pub queued_bytes: u64,
    pub input_count: u64,
    pub input_bytes: u64,
    pub output_count: u64,
    pub output_bytes: u64,
}

/// One input port on the remote side of a remote process group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemotePortStatus {
    pub name: String,
    pub target_exists: bool,
    pub target_running: bool,
}

impl RemotePortStatus {
    /// Human-readable state of the port's target.
    pub fn target_description(&self) -> &'static str {
        if !self.target_exists {
            "target does not exist"
        } else if !self.target_running {
            "target exists but is not running"
        } else {
            "target exists and is running"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteProcessGroupStatus {
    pub id: String,
    pub name: String,
    pub transmission_status: TransmissionStatus,
    pub active_remote_port_count: u32,
    pub inactive_remote_port_count: u32,
    pub active_thread_count: u32,
    pub sent_count: u64,
    pub sent_content_size: u64,
    pub authorization_issues: Vec<String>,
    pub input_ports: Vec<RemotePortStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerServiceStatus {
    pub id: String,
    pub name: String,
    pub state: ControllerServiceState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingTaskStatus {
    pub id: String,
    pub name: String,
    pub scheduled_state: ScheduledState,
    pub active_thread_count: u32,
}

/// Aggregated status of the whole flow (root group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceStatus {
    pub queued_count: u64,
    pub queued_content_size: u64,
    pub active_thread_count: u32,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub bytes_sent: u64,
    pub flow_files_sent: u64,
    pub bytes_transferred: u64,
    pub flow_files_transferred: u64,
    pub bytes_received: u64,
    pub flow_files_received: u64,
}

/// Heap and non-heap memory figures.
///
/// Utilization values are percentages computed by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeapUsage {
    pub total_heap: u64,
    pub max_heap: u64,
    pub free_heap: u64,
    pub used_heap: u64,
    pub heap_utilization: u32,
    pub total_non_heap: u64,
    pub max_non_heap: u64,
    pub free_non_heap: u64,
    pub used_non_heap: u64,
    pub non_heap_utilization: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageUsage {
    pub identifier: String,
    pub free_space: u64,
    pub total_space: u64,
    pub used_space: u64,
    pub disk_utilization: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarbageCollection {
    pub name: String,
    pub collection_count: u64,
    /// Accumulated collection time in milliseconds.
    pub collection_time: u64,
}

/// Point-in-time diagnostics of the host process.
///
/// `content_repositories` and `garbage_collection` keep the provider's
/// iteration order; rendering never re-sorts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemDiagnostics {
    pub heap: HeapUsage,
    pub processor_load_average: f64,
    pub available_processors: u32,
    pub content_repositories: Vec<StorageUsage>,
    pub flow_file_repository: StorageUsage,
    pub garbage_collection: Vec<GarbageCollection>,
}

/// A timestamped message attached to a component (or to the controller when
/// `source_id` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bulletin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Bulletin {
    pub fn new(source_id: impl Into<String>, timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            timestamp,
            message: message.into(),
        }
    }

    /// A controller-level bulletin (no source component).
    pub fn controller(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            source_id: None,
            timestamp,
            message: message.into(),
        }
    }
}

/// Why a component's configuration is (or is not) valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationIssue {
    pub subject: String,
    pub input: String,
    pub explanation: String,
    pub valid: bool,
}

impl ValidationIssue {
    /// An invalid result, the only kind that shows up in reports.
    pub fn invalid(
        subject: impl Into<String>,
        input: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            input: input.into(),
            explanation: explanation.into(),
            valid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn enum_states_display_like_the_wire_format() {
        assert_eq!(RunStatus::Stopped.to_string(), "Stopped");
        assert_eq!(ControllerServiceState::Enabled.to_string(), "ENABLED");
        assert_eq!(ScheduledState::Running.to_string(), "RUNNING");
        assert_eq!(TransmissionStatus::Transmitting.to_string(), "Transmitting");
    }

    #[test]
    fn controller_service_state_serializes_upper_case() {
        let s = serde_json::to_string(&ControllerServiceState::Disabling).unwrap();
        assert_eq!(s, "\"DISABLING\"");
    }

    #[rstest]
    #[case::missing(false, false, "target does not exist")]
    #[case::missing_but_flagged_running(false, true, "target does not exist")]
    #[case::stopped(true, false, "target exists but is not running")]
    #[case::running(true, true, "target exists and is running")]
    fn remote_port_target_description(
        #[case] target_exists: bool,
        #[case] target_running: bool,
        #[case] expected: &str,
    ) {
        let port = RemotePortStatus {
            name: "in".to_string(),
            target_exists,
            target_running,
        };
        assert_eq!(port.target_description(), expected);
    }

    #[test]
    fn sparse_processor_json_gets_defaults() {
        let p: ProcessorStatus = serde_json::from_str(r#"{ "id": "P1" }"#).unwrap();
        assert_eq!(p.id, "P1");
        assert_eq!(p.run_status, RunStatus::Stopped);
        assert_eq!(p.bytes_read, 0);
    }
}
