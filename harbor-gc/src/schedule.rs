use std::fmt;

use chrono::{DateTime, Duration, Utc};
use croner::Cron;
use harbor_models::{
    gc::ExecutionSchedule,
    schedule::{ScheduleObj, ScheduleType},
};
use log::debug;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;

/// Offset applied when a cron-bearing schedule is built without a next run time.
pub const DEFAULT_NEXT_RUN_OFFSET_HOURS: i64 = 24;

/// Schedule types that carry a cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CronKind {
    Hourly,
    Daily,
    Weekly,
    Custom,
    Schedule,
}

impl CronKind {
    pub fn schedule_type(self) -> ScheduleType {
        match self {
            CronKind::Hourly => ScheduleType::Hourly,
            CronKind::Daily => ScheduleType::Daily,
            CronKind::Weekly => ScheduleType::Weekly,
            CronKind::Custom => ScheduleType::Custom,
            CronKind::Schedule => ScheduleType::Schedule,
        }
    }

    pub fn from_schedule_type(schedule_type: ScheduleType) -> Option<Self> {
        match schedule_type {
            ScheduleType::Hourly => Some(CronKind::Hourly),
            ScheduleType::Daily => Some(CronKind::Daily),
            ScheduleType::Weekly => Some(CronKind::Weekly),
            ScheduleType::Custom => Some(CronKind::Custom),
            ScheduleType::Schedule => Some(CronKind::Schedule),
            ScheduleType::Manual | ScheduleType::None => None,
        }
    }
}

/// A non-empty six-field cron expression (seconds first), the form the registry accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression(String);

impl CronExpression {
    pub fn parse(kind: CronKind, raw: &str) -> Result<Self, ValidationError> {
        let expression = raw.trim();
        if expression.is_empty() {
            return Err(ValidationError::MissingCronExpression(kind.schedule_type()));
        }
        // croner expands nicknames such as `@daily`; the registry does not.
        if expression.starts_with('@') {
            return Err(ValidationError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: "nicknames are not supported, use six fields".to_string(),
            });
        }
        Cron::new(expression)
            .with_seconds_required()
            .parse()
            .map_err(|err| ValidationError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self(expression.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CronExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated GC schedule. Each variant carries exactly the fields its type needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleDescriptor {
    /// Recurring run driven by a cron expression.
    Cron {
        kind: CronKind,
        cron: CronExpression,
        next_run: DateTime<Utc>,
    },
    /// One-shot run, triggered immediately.
    Manual { run_at: DateTime<Utc> },
    /// Turns an existing schedule off.
    Disabled,
}

impl ScheduleDescriptor {
    /// Cron-bearing schedule; `next_run` defaults to now + 24h.
    pub fn cron(kind: CronKind, cron: CronExpression, next_run: Option<DateTime<Utc>>) -> Self {
        ScheduleDescriptor::Cron {
            kind,
            cron,
            next_run: next_run.unwrap_or_else(|| default_next_run(Utc::now())),
        }
    }

    pub fn manual() -> Self {
        ScheduleDescriptor::Manual { run_at: Utc::now() }
    }

    pub fn disabled() -> Self {
        ScheduleDescriptor::Disabled
    }

    pub fn schedule_type(&self) -> ScheduleType {
        match self {
            ScheduleDescriptor::Cron { kind, .. } => kind.schedule_type(),
            ScheduleDescriptor::Manual { .. } => ScheduleType::Manual,
            ScheduleDescriptor::Disabled => ScheduleType::None,
        }
    }

    /// Cron text as sent to the registry; empty for `Manual` and `None`.
    pub fn cron_expression(&self) -> &str {
        match self {
            ScheduleDescriptor::Cron { cron, .. } => cron.as_str(),
            _ => "",
        }
    }

    pub fn next_run_time(&self) -> Option<DateTime<Utc>> {
        match self {
            ScheduleDescriptor::Cron { next_run, .. } => Some(*next_run),
            ScheduleDescriptor::Manual { run_at } => Some(*run_at),
            ScheduleDescriptor::Disabled => None,
        }
    }

    pub fn to_wire(&self) -> ScheduleObj {
        ScheduleObj {
            schedule_type: self.schedule_type(),
            cron: self.cron_expression().to_string(),
            next_scheduled_time: self.next_run_time(),
        }
    }

    /// Read a schedule reported by the registry. `None` means no schedule is set.
    ///
    /// The registry's cron text is trusted as-is; only field presence is checked.
    /// Tags outside the canonical set are rejected with `InvalidScheduleType`.
    pub fn from_wire(obj: &ExecutionSchedule) -> Result<Option<Self>, ValidationError> {
        let schedule_type = obj
            .parsed_type()
            .map_err(|err| ValidationError::InvalidScheduleType(err.0))?;
        match CronKind::from_schedule_type(schedule_type) {
            Some(kind) => {
                let cron = obj.cron.trim();
                if cron.is_empty() {
                    return Err(ValidationError::MissingCronExpression(schedule_type));
                }
                let next_run = obj
                    .next_scheduled_time
                    .ok_or(ValidationError::MissingNextRunTime(schedule_type))?;
                Ok(Some(ScheduleDescriptor::Cron {
                    kind,
                    cron: CronExpression(cron.to_string()),
                    next_run,
                }))
            }
            None if schedule_type == ScheduleType::Manual => {
                let run_at = obj
                    .next_scheduled_time
                    .ok_or(ValidationError::MissingNextRunTime(schedule_type))?;
                Ok(Some(ScheduleDescriptor::Manual { run_at }))
            }
            None => Ok(None),
        }
    }
}

impl fmt::Display for ScheduleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDescriptor::Cron {
                kind,
                cron,
                next_run,
            } => write!(
                f,
                "{} (cron '{}', next run {})",
                kind.schedule_type(),
                cron,
                next_run.to_rfc3339()
            ),
            ScheduleDescriptor::Manual { run_at } => {
                write!(f, "Manual (run at {})", run_at.to_rfc3339())
            }
            ScheduleDescriptor::Disabled => f.write_str("None (disabled)"),
        }
    }
}

impl Serialize for ScheduleDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// Build a schedule from raw user input, using the current time for defaults.
pub fn build_schedule(
    schedule_type: &str,
    cron: &str,
    next_run_time: Option<&str>,
) -> Result<ScheduleDescriptor, ValidationError> {
    build_schedule_at(schedule_type, cron, next_run_time, Utc::now())
}

/// Same as [`build_schedule`] with an explicit "now".
///
/// Checks run in a fixed order: type, missing cron, timestamp, cron syntax.
/// A blank `next_run_time` counts as omitted.
pub fn build_schedule_at(
    schedule_type: &str,
    cron: &str,
    next_run_time: Option<&str>,
    now: DateTime<Utc>,
) -> Result<ScheduleDescriptor, ValidationError> {
    if schedule_type.trim().is_empty() {
        return Err(ValidationError::MissingScheduleType);
    }
    let schedule_type: ScheduleType = schedule_type
        .parse()
        .map_err(|_| ValidationError::InvalidScheduleType(schedule_type.to_string()))?;

    match CronKind::from_schedule_type(schedule_type) {
        Some(kind) => {
            if cron.trim().is_empty() {
                return Err(ValidationError::MissingCronExpression(schedule_type));
            }
            let next_run = parse_next_run_time(next_run_time)?;
            let cron = CronExpression::parse(kind, cron)?;
            Ok(ScheduleDescriptor::Cron {
                kind,
                cron,
                next_run: next_run.unwrap_or_else(|| default_next_run(now)),
            })
        }
        None => {
            let next_run = parse_next_run_time(next_run_time)?;
            if !cron.trim().is_empty() {
                debug!("ignoring cron '{}' for schedule type '{}'", cron.trim(), schedule_type);
            }
            if next_run.is_some() {
                debug!("ignoring next run time for schedule type '{}'", schedule_type);
            }
            if schedule_type == ScheduleType::Manual {
                Ok(ScheduleDescriptor::Manual { run_at: now })
            } else {
                Ok(ScheduleDescriptor::Disabled)
            }
        }
    }
}

/// Parse an RFC 3339 timestamp (offset required) into UTC.
pub fn parse_next_run_time(
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|_| ValidationError::InvalidTimestamp(raw.to_string()))
}

fn default_next_run(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(DEFAULT_NEXT_RUN_OFFSET_HOURS)
}
