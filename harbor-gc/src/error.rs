use std::fmt;

use harbor_api::RemoteFailure;
use harbor_models::schedule::ScheduleType;
use thiserror::Error;

pub const MAX_PAGE_SIZE: i64 = 100;
pub const MAX_WORKERS: u8 = 5;

/// Input problems caught locally; none of these ever reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("schedule type is required")]
    MissingScheduleType,

    #[error(
        "invalid schedule type '{0}' (expected one of Hourly, Daily, Weekly, Custom, Manual, None, Schedule)"
    )]
    InvalidScheduleType(String),

    #[error("cron expression is required for schedule type '{0}'")]
    MissingCronExpression(ScheduleType),

    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },

    #[error("invalid timestamp '{0}': expected RFC 3339 with a UTC offset, e.g. 2025-01-31T02:00:00Z")]
    InvalidTimestamp(String),

    #[error("schedule type '{0}' requires a next run time")]
    MissingNextRunTime(ScheduleType),

    #[error("invalid GC execution id {0}: must be a positive integer")]
    InvalidExecutionId(i64),

    #[error("invalid worker count {0}: must be between 1 and {max}", max = MAX_WORKERS)]
    InvalidWorkerCount(u8),

    #[error(
        "invalid pagination (page {page}, page size {page_size}): page must be at least 1 and page size between 1 and {max}",
        max = MAX_PAGE_SIZE
    )]
    InvalidPagination { page: i64, page_size: i64 },
}

/// The operation a failure belongs to, used to phrase error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateSchedule,
    UpdateSchedule,
    GetSchedule,
    StopExecution,
    ListHistory,
    GetStatus,
    GetLog,
}

impl Operation {
    #[cfg(test)]
    const ALL: [Operation; 7] = [
        Operation::CreateSchedule,
        Operation::UpdateSchedule,
        Operation::GetSchedule,
        Operation::StopExecution,
        Operation::ListHistory,
        Operation::GetStatus,
        Operation::GetLog,
    ];

    fn verb(&self) -> &'static str {
        match self {
            Operation::CreateSchedule => "create",
            Operation::UpdateSchedule => "update",
            Operation::GetSchedule => "get",
            Operation::StopExecution => "stop",
            Operation::ListHistory => "list",
            Operation::GetStatus => "get the status of",
            Operation::GetLog => "get the log of",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Domain-level outcome of a failed GC command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GcError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("bad request to {operation} {resource}: {message}")]
    BadRequest {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("unauthorized to {operation} {resource}: {message}")]
    Unauthorized {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("insufficient permissions to {operation} {resource}: {message}")]
    Forbidden {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("{resource} not found, cannot {operation} it: {message}")]
    NotFound {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("{resource} already exists: {message}")]
    DuplicateSchedule { resource: String, message: String },

    #[error("{resource} is already stopped: {message}")]
    AlreadyStopped { resource: String, message: String },

    #[error("conflict while trying to {operation} {resource}: {message}")]
    Conflict {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("internal server error occurred while trying to {operation} {resource}: {message}")]
    ServerFault {
        operation: Operation,
        resource: String,
        message: String,
    },

    #[error("unknown error occurred while trying to {operation} {resource}: {cause}")]
    UnknownFailure {
        operation: Operation,
        resource: String,
        #[source]
        cause: RemoteFailure,
    },
}

impl GcError {
    /// Map an adapter failure onto the domain taxonomy, keeping the resource
    /// identifier in the message.
    pub fn from_remote(
        operation: Operation,
        resource: impl Into<String>,
        failure: RemoteFailure,
    ) -> Self {
        let resource = resource.into();
        match failure {
            RemoteFailure::BadRequest { message } => GcError::BadRequest {
                operation,
                resource,
                message,
            },
            RemoteFailure::Unauthorized { message } => GcError::Unauthorized {
                operation,
                resource,
                message,
            },
            RemoteFailure::Forbidden { message } => GcError::Forbidden {
                operation,
                resource,
                message,
            },
            RemoteFailure::NotFound { message } => GcError::NotFound {
                operation,
                resource,
                message,
            },
            RemoteFailure::Conflict { message } => match operation {
                Operation::CreateSchedule => GcError::DuplicateSchedule { resource, message },
                Operation::StopExecution => GcError::AlreadyStopped { resource, message },
                _ => GcError::Conflict {
                    operation,
                    resource,
                    message,
                },
            },
            RemoteFailure::InternalServerError { message } => GcError::ServerFault {
                operation,
                resource,
                message,
            },
            cause @ RemoteFailure::Unknown { .. } => GcError::UnknownFailure {
                operation,
                resource,
                cause,
            },
        }
    }

    /// True when the failure was detected locally and no request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, GcError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn all_failures() -> Vec<RemoteFailure> {
        let message = "registry said no".to_string();
        vec![
            RemoteFailure::BadRequest { message: message.clone() },
            RemoteFailure::Unauthorized { message: message.clone() },
            RemoteFailure::Forbidden { message: message.clone() },
            RemoteFailure::NotFound { message: message.clone() },
            RemoteFailure::Conflict { message: message.clone() },
            RemoteFailure::InternalServerError { message },
            RemoteFailure::Unknown {
                status: Some(503),
                cause: "maintenance".to_string(),
            },
        ]
    }

    #[test]
    fn every_failure_maps_to_a_distinct_message_with_resource() {
        for operation in Operation::ALL {
            let resource = format!("resource-for-{operation}");
            let messages: Vec<String> = all_failures()
                .into_iter()
                .map(|failure| {
                    GcError::from_remote(operation, resource.clone(), failure).to_string()
                })
                .collect();
            for message in &messages {
                assert!(message.contains(&resource), "{message} lacks {resource}");
            }
            let unique: HashSet<&String> = messages.iter().collect();
            assert_eq!(unique.len(), messages.len(), "overlap for {operation}: {messages:?}");
        }
    }

    #[test]
    fn conflict_is_specialised_per_operation() {
        let conflict = || RemoteFailure::Conflict {
            message: "exists".to_string(),
        };
        assert!(matches!(
            GcError::from_remote(Operation::CreateSchedule, "GC schedule 'Daily'", conflict()),
            GcError::DuplicateSchedule { .. }
        ));
        assert!(matches!(
            GcError::from_remote(Operation::StopExecution, "GC execution 3", conflict()),
            GcError::AlreadyStopped { .. }
        ));
        assert!(matches!(
            GcError::from_remote(Operation::UpdateSchedule, "GC schedule 'Daily'", conflict()),
            GcError::Conflict { .. }
        ));
    }

    #[test]
    fn unknown_failure_keeps_cause() {
        let error = GcError::from_remote(
            Operation::GetLog,
            "GC execution 12",
            RemoteFailure::transport("connection reset"),
        );
        assert_eq!(
            error.to_string(),
            "unknown error occurred while trying to get the log of GC execution 12: unexpected failure: connection reset"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn validation_errors_are_flagged() {
        let error: GcError = ValidationError::InvalidExecutionId(0).into();
        assert!(error.is_validation());
        assert_eq!(
            error.to_string(),
            "invalid GC execution id 0: must be a positive integer"
        );
    }
}
