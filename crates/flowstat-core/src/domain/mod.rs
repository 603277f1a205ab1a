//! Domain model: status records, the query language, and errors.

pub mod errors;
pub mod query;
pub mod status;

pub use self::errors::{ProviderError, StatusError};
pub use self::query::{Facet, Query, QueryItem, Selector, StatusRequest, Target, TargetKind};
pub use self::status::{
    Bulletin, ConnectionStatus, ControllerServiceState, ControllerServiceStatus,
    GarbageCollection, HeapUsage, InstanceStatus, ProcessorStatus, RemotePortStatus,
    RemoteProcessGroupStatus, ReportingTaskStatus, RunStatus, ScheduledState, StorageUsage,
    SystemDiagnostics, TransmissionStatus, ValidationIssue,
};
