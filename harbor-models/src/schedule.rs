use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Schedule type tag understood by the registry's GC scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleType {
    Hourly,
    Daily,
    Weekly,
    Custom,
    Manual,
    None,
    Schedule,
}

impl ScheduleType {
    pub const ALL: [ScheduleType; 7] = [
        ScheduleType::Hourly,
        ScheduleType::Daily,
        ScheduleType::Weekly,
        ScheduleType::Custom,
        ScheduleType::Manual,
        ScheduleType::None,
        ScheduleType::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Hourly => "Hourly",
            ScheduleType::Daily => "Daily",
            ScheduleType::Weekly => "Weekly",
            ScheduleType::Custom => "Custom",
            ScheduleType::Manual => "Manual",
            ScheduleType::None => "None",
            ScheduleType::Schedule => "Schedule",
        }
    }

    /// Types that require a cron expression.
    pub fn is_cron_bearing(&self) -> bool {
        !matches!(self, ScheduleType::Manual | ScheduleType::None)
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownScheduleType(pub String);

impl fmt::Display for UnknownScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown schedule type '{}'", self.0)
    }
}

impl std::error::Error for UnknownScheduleType {}

impl FromStr for ScheduleType {
    type Err = UnknownScheduleType;

    // Case-sensitive: the server only accepts the canonical spelling.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ScheduleType::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| UnknownScheduleType(value.to_string()))
    }
}

/// Wire form of a schedule as exchanged with the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleObj {
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub cron: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_scheduled_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names_only() {
        for schedule_type in ScheduleType::ALL {
            assert_eq!(schedule_type.as_str().parse::<ScheduleType>(), Ok(schedule_type));
        }
        assert_eq!(
            "daily".parse::<ScheduleType>(),
            Err(UnknownScheduleType("daily".to_string()))
        );
        assert!("".parse::<ScheduleType>().is_err());
    }

    #[test]
    fn cron_bearing_group() {
        let bearing: Vec<_> = ScheduleType::ALL
            .into_iter()
            .filter(ScheduleType::is_cron_bearing)
            .collect();
        assert_eq!(
            bearing,
            vec![
                ScheduleType::Hourly,
                ScheduleType::Daily,
                ScheduleType::Weekly,
                ScheduleType::Custom,
                ScheduleType::Schedule,
            ]
        );
    }

    #[test]
    fn omits_unset_next_scheduled_time() {
        let obj = ScheduleObj {
            schedule_type: ScheduleType::None,
            cron: String::new(),
            next_scheduled_time: None,
        };
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "None", "cron": "" }));
    }

    #[test]
    fn decodes_server_schedule() {
        let obj: ScheduleObj = serde_json::from_str(
            r#"{"type":"Daily","cron":"0 0 0 * * *","next_scheduled_time":"2024-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(obj.schedule_type, ScheduleType::Daily);
        assert_eq!(obj.cron, "0 0 0 * * *");
        assert!(obj.next_scheduled_time.is_some());
    }
}
