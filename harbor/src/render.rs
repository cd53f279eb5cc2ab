use std::io::{self, Write};

use chrono::{DateTime, Local, Utc};
use harbor_config::OutputFormat;
use harbor_gc::{ScheduleDescriptor, ScheduleSnapshot};
use harbor_models::gc::{GcExecution, GcHistoryPage};
use harbor_utilities::data_export::{
    csv::CsvTableExporter, table::BoxTableExporter, TableData, TableExporter,
};
use serde::Serialize;

use crate::DynError;

pub fn schedule(snapshot: &ScheduleSnapshot, format: OutputFormat) -> Result<(), DynError> {
    match format {
        OutputFormat::Json => print_json(snapshot),
        _ => emit(&schedule_table(snapshot), format),
    }
}

pub fn history(page: &GcHistoryPage, format: OutputFormat) -> Result<(), DynError> {
    match format {
        OutputFormat::Json => print_json(page),
        OutputFormat::Csv => emit(&history_table(&page.executions), format),
        OutputFormat::Table => {
            emit(&history_table(&page.executions), format)?;
            if let Some(total) = page.total {
                println!("{} of {} execution(s)", page.executions.len(), total);
            }
            Ok(())
        }
    }
}

pub fn execution(execution: &GcExecution, format: OutputFormat) -> Result<(), DynError> {
    match format {
        OutputFormat::Json => print_json(execution),
        _ => emit(&execution_table(execution), format),
    }
}

fn emit(table: &TableData, format: OutputFormat) -> Result<(), DynError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Csv => CsvTableExporter::new().export(&mut out, table)?,
        _ => BoxTableExporter::new().export(&mut out, table)?,
    }
    out.flush()?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), DynError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn schedule_table(snapshot: &ScheduleSnapshot) -> TableData {
    let (schedule_type, cron, next_run) = match &snapshot.schedule {
        Some(descriptor) => (
            descriptor.schedule_type().to_string(),
            non_empty(descriptor.cron_expression()),
            human_time(descriptor.next_run_time()),
        ),
        None => ("None".to_string(), "-".to_string(), "-".to_string()),
    };
    let parameters = snapshot.parameters.clone().unwrap_or_default();

    TableData::from_pairs([
        ("type", schedule_type),
        ("cron", cron),
        ("next run", next_run),
        ("delete untagged", parameters.delete_untagged.to_string()),
        ("dry run", parameters.dry_run.to_string()),
        (
            "workers",
            parameters
                .workers
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        ("status", non_empty(&snapshot.job_status)),
        ("updated", human_time(snapshot.update_time)),
    ])
}

fn history_table(executions: &[GcExecution]) -> TableData {
    let headers = ["id", "status", "kind", "schedule", "created", "updated"];
    let rows = executions
        .iter()
        .map(|execution| {
            vec![
                execution.id.to_string(),
                non_empty(&execution.job_status),
                non_empty(&execution.job_kind),
                schedule_cell(execution),
                human_time(execution.creation_time),
                human_time(execution.update_time),
            ]
        })
        .collect();
    TableData::new(headers.iter().map(|v| v.to_string()).collect(), rows)
}

fn execution_table(execution: &GcExecution) -> TableData {
    TableData::from_pairs([
        ("id", execution.id.to_string()),
        ("status", non_empty(&execution.job_status)),
        ("kind", non_empty(&execution.job_kind)),
        ("name", non_empty(&execution.job_name)),
        ("schedule", schedule_cell(execution)),
        ("parameters", non_empty(&execution.job_parameters)),
        ("deleted", execution.deleted.to_string()),
        ("created", human_time(execution.creation_time)),
        ("updated", human_time(execution.update_time)),
    ])
}

fn schedule_cell(execution: &GcExecution) -> String {
    match &execution.schedule {
        Some(obj) => match ScheduleDescriptor::from_wire(obj) {
            Ok(Some(descriptor)) => descriptor.to_string(),
            Ok(None) => "None".to_string(),
            Err(_) => non_empty(&obj.schedule_type),
        },
        None => "-".to_string(),
    }
}

fn non_empty(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn human_time(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|time| {
            time.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}
