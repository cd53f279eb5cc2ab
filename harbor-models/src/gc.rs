use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{ScheduleObj, ScheduleType, UnknownScheduleType};

/// Knobs forwarded to the GC job alongside its schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcParameters {
    #[serde(default)]
    pub delete_untagged: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u8>,
}

/// Body of the create/update schedule calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GcScheduleRequest {
    pub schedule: ScheduleObj,
    pub parameters: GcParameters,
}

/// Schedule attached to a GC record as the registry reports it.
///
/// Read-side only: history rows carry the trigger (`MANUAL`, `SCHEDULE`) in
/// the type field, so the tag is kept as text rather than a `ScheduleType`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSchedule {
    #[serde(rename = "type")]
    pub schedule_type: String,
    pub cron: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_scheduled_time: Option<DateTime<Utc>>,
}

impl ExecutionSchedule {
    /// Canonical schedule type, if the reported tag is one.
    pub fn parsed_type(&self) -> Result<ScheduleType, UnknownScheduleType> {
        self.schedule_type.parse()
    }
}

impl From<ScheduleObj> for ExecutionSchedule {
    fn from(obj: ScheduleObj) -> Self {
        Self {
            schedule_type: obj.schedule_type.to_string(),
            cron: obj.cron,
            next_scheduled_time: obj.next_scheduled_time,
        }
    }
}

/// One GC run (or the schedule record itself) as reported by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcExecution {
    pub id: i64,
    pub job_name: String,
    pub job_kind: String,
    pub job_parameters: String,
    pub schedule: Option<ExecutionSchedule>,
    pub job_status: String,
    pub deleted: bool,
    pub creation_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub page: i64,
    pub page_size: i64,
    pub query: Option<String>,
    pub sort: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            query: None,
            sort: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GcHistoryPage {
    pub executions: Vec<GcExecution>,
    /// Value of the `X-Total-Count` header, when the server sent one.
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_sparse_execution() {
        let execution: GcExecution =
            serde_json::from_str(r#"{"id":7,"job_status":"Running"}"#).unwrap();
        assert_eq!(execution.id, 7);
        assert_eq!(execution.job_status, "Running");
        assert!(execution.schedule.is_none());
        assert!(execution.creation_time.is_none());
    }

    #[test]
    fn decodes_history_rows_with_trigger_types() {
        let rows: Vec<GcExecution> = serde_json::from_str(
            r#"[
                {"id":12,"job_name":"GARBAGE_COLLECTION","job_kind":"MANUAL",
                 "schedule":{"type":"MANUAL","cron":""},"job_status":"Success",
                 "deleted":false,"creation_time":"2025-03-01T10:00:00Z",
                 "update_time":"2025-03-01T10:05:00Z"},
                {"id":13,"job_kind":"SCHEDULE",
                 "schedule":{"type":"SCHEDULE","cron":"0 0 0 * * *"},
                 "job_status":"Running"}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        let manual = rows[0].schedule.as_ref().unwrap();
        assert_eq!(manual.schedule_type, "MANUAL");
        assert!(manual.parsed_type().is_err());
        assert_eq!(rows[1].schedule.as_ref().unwrap().cron, "0 0 0 * * *");
    }

    #[test]
    fn canonical_tags_parse() {
        let schedule = ExecutionSchedule::from(ScheduleObj {
            schedule_type: ScheduleType::Weekly,
            cron: "0 0 0 * * 0".to_string(),
            next_scheduled_time: None,
        });
        assert_eq!(schedule.schedule_type, "Weekly");
        assert_eq!(schedule.parsed_type(), Ok(ScheduleType::Weekly));
    }

    #[test]
    fn workers_omitted_when_unset() {
        let json = serde_json::to_value(GcParameters::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "delete_untagged": false, "dry_run": false })
        );
    }
}
