use chrono::{DateTime, Utc};
use harbor_api::{GcRemote, RemoteFailure, RequestContext};
use harbor_models::gc::{GcExecution, GcHistoryPage, GcParameters, GcScheduleRequest, HistoryQuery};
use log::{info, warn};
use serde::Serialize;

use crate::{
    error::{GcError, Operation, ValidationError, MAX_PAGE_SIZE, MAX_WORKERS},
    schedule::ScheduleDescriptor,
};

/// Current GC schedule as reported by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSnapshot {
    /// `None` when no schedule is configured.
    pub schedule: Option<ScheduleDescriptor>,
    pub parameters: Option<GcParameters>,
    pub job_status: String,
    pub creation_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

/// GC schedule and execution commands.
///
/// Every operation is a single request against the injected remote; local
/// preconditions are checked first and short-circuit without a call.
#[derive(Debug, Clone)]
pub struct GcService<R> {
    remote: R,
}

impl<R> GcService<R>
where
    R: GcRemote,
{
    pub fn new(remote: R) -> Self {
        Self { remote }
    }

    /// Create the GC schedule.
    pub fn create(
        &self,
        ctx: &RequestContext,
        schedule: &ScheduleDescriptor,
        parameters: &GcParameters,
    ) -> Result<(), GcError> {
        let request = schedule_request(schedule, parameters)?;
        self.remote
            .create_gc_schedule(ctx, &request)
            .map_err(|failure| {
                GcError::from_remote(Operation::CreateSchedule, schedule_resource(schedule), failure)
            })?;
        info!("GC schedule created: {schedule}");
        Ok(())
    }

    /// Replace the GC schedule. This is a full replacement, not a merge.
    pub fn update(
        &self,
        ctx: &RequestContext,
        schedule: &ScheduleDescriptor,
        parameters: &GcParameters,
    ) -> Result<(), GcError> {
        let request = schedule_request(schedule, parameters)?;
        self.remote
            .update_gc_schedule(ctx, &request)
            .map_err(|failure| {
                GcError::from_remote(Operation::UpdateSchedule, schedule_resource(schedule), failure)
            })?;
        info!("GC schedule updated: {schedule}");
        Ok(())
    }

    /// Fetch the current schedule.
    pub fn get(&self, ctx: &RequestContext) -> Result<ScheduleSnapshot, GcError> {
        let resource = "GC schedule";
        let record = self
            .remote
            .get_gc_schedule(ctx)
            .map_err(|failure| GcError::from_remote(Operation::GetSchedule, resource, failure))?;

        let schedule = match &record.schedule {
            Some(obj) => ScheduleDescriptor::from_wire(obj).map_err(|err| {
                let cause = format!("registry returned an inconsistent schedule: {err}");
                GcError::from_remote(
                    Operation::GetSchedule,
                    resource,
                    RemoteFailure::transport(cause),
                )
            })?,
            None => None,
        };

        Ok(ScheduleSnapshot {
            schedule,
            parameters: decode_parameters(&record),
            job_status: record.job_status,
            creation_time: record.creation_time,
            update_time: record.update_time,
        })
    }

    /// Signal a running execution to stop.
    pub fn stop(&self, ctx: &RequestContext, gc_id: i64) -> Result<(), GcError> {
        ensure_execution_id(gc_id)?;
        self.remote
            .stop_gc(ctx, gc_id)
            .map_err(|failure| {
                GcError::from_remote(Operation::StopExecution, execution_resource(gc_id), failure)
            })?;
        info!("GC execution {gc_id} stopped");
        Ok(())
    }

    /// List past and running executions.
    pub fn history(
        &self,
        ctx: &RequestContext,
        query: &HistoryQuery,
    ) -> Result<GcHistoryPage, GcError> {
        if query.page < 1 || query.page_size < 1 || query.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPagination {
                page: query.page,
                page_size: query.page_size,
            }
            .into());
        }
        let page = self.remote.get_gc_history(ctx, query).map_err(|failure| {
            GcError::from_remote(Operation::ListHistory, history_resource(query), failure)
        })?;
        info!(
            "Retrieved {} GC execution(s) (page {}, total {})",
            page.executions.len(),
            query.page,
            page.total.map_or_else(|| "unknown".to_string(), |total| total.to_string())
        );
        Ok(page)
    }

    /// Fetch one execution record.
    pub fn status(&self, ctx: &RequestContext, gc_id: i64) -> Result<GcExecution, GcError> {
        ensure_execution_id(gc_id)?;
        self.remote.get_gc(ctx, gc_id).map_err(|failure| {
            GcError::from_remote(Operation::GetStatus, execution_resource(gc_id), failure)
        })
    }

    /// Fetch the raw log of one execution.
    pub fn log(&self, ctx: &RequestContext, gc_id: i64) -> Result<String, GcError> {
        ensure_execution_id(gc_id)?;
        self.remote.get_gc_log(ctx, gc_id).map_err(|failure| {
            GcError::from_remote(Operation::GetLog, execution_resource(gc_id), failure)
        })
    }
}

fn ensure_execution_id(gc_id: i64) -> Result<(), ValidationError> {
    if gc_id <= 0 {
        return Err(ValidationError::InvalidExecutionId(gc_id));
    }
    Ok(())
}

fn schedule_request(
    schedule: &ScheduleDescriptor,
    parameters: &GcParameters,
) -> Result<GcScheduleRequest, ValidationError> {
    if let Some(workers) = parameters.workers {
        if !(1..=MAX_WORKERS).contains(&workers) {
            return Err(ValidationError::InvalidWorkerCount(workers));
        }
    }
    Ok(GcScheduleRequest {
        schedule: schedule.to_wire(),
        parameters: parameters.clone(),
    })
}

fn decode_parameters(record: &GcExecution) -> Option<GcParameters> {
    let raw = record.job_parameters.trim();
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str::<GcParameters>(raw) {
        Ok(parameters) => Some(parameters),
        Err(err) => {
            warn!("Could not decode GC job parameters '{raw}': {err}");
            None
        }
    }
}

fn schedule_resource(schedule: &ScheduleDescriptor) -> String {
    format!("GC schedule '{}'", schedule.schedule_type())
}

fn execution_resource(gc_id: i64) -> String {
    format!("GC execution {gc_id}")
}

fn history_resource(query: &HistoryQuery) -> String {
    format!(
        "GC history (page {}, page size {})",
        query.page, query.page_size
    )
}
