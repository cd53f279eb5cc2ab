use harbor_models::gc::{GcExecution, GcHistoryPage, GcScheduleRequest, HistoryQuery};

use crate::{context::RequestContext, error::RemoteResult};

/// Registry operations backing the GC commands.
///
/// Implementations perform exactly one request per call and never retry.
pub trait GcRemote {
    fn create_gc_schedule(&self, ctx: &RequestContext, request: &GcScheduleRequest)
        -> RemoteResult<()>;

    fn update_gc_schedule(&self, ctx: &RequestContext, request: &GcScheduleRequest)
        -> RemoteResult<()>;

    fn get_gc_schedule(&self, ctx: &RequestContext) -> RemoteResult<GcExecution>;

    fn get_gc_history(&self, ctx: &RequestContext, query: &HistoryQuery)
        -> RemoteResult<GcHistoryPage>;

    fn get_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<GcExecution>;

    fn get_gc_log(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<String>;

    fn stop_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<()>;
}

impl<T> GcRemote for &T
where
    T: GcRemote + ?Sized,
{
    fn create_gc_schedule(
        &self,
        ctx: &RequestContext,
        request: &GcScheduleRequest,
    ) -> RemoteResult<()> {
        (**self).create_gc_schedule(ctx, request)
    }

    fn update_gc_schedule(
        &self,
        ctx: &RequestContext,
        request: &GcScheduleRequest,
    ) -> RemoteResult<()> {
        (**self).update_gc_schedule(ctx, request)
    }

    fn get_gc_schedule(&self, ctx: &RequestContext) -> RemoteResult<GcExecution> {
        (**self).get_gc_schedule(ctx)
    }

    fn get_gc_history(
        &self,
        ctx: &RequestContext,
        query: &HistoryQuery,
    ) -> RemoteResult<GcHistoryPage> {
        (**self).get_gc_history(ctx, query)
    }

    fn get_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<GcExecution> {
        (**self).get_gc(ctx, gc_id)
    }

    fn get_gc_log(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<String> {
        (**self).get_gc_log(ctx, gc_id)
    }

    fn stop_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<()> {
        (**self).stop_gc(ctx, gc_id)
    }
}
