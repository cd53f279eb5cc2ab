use std::time::Duration;

use harbor_models::gc::{GcExecution, GcHistoryPage, GcScheduleRequest, HistoryQuery};
use log::debug;
use reqwest::{
    blocking::{Client, RequestBuilder, Response},
    Method, Url,
};
use uuid::Uuid;

use crate::{
    context::RequestContext,
    error::{RemoteFailure, RemoteResult, Result},
    remote::GcRemote,
};

const REQUEST_ID_HEADER: &str = "X-Request-Id";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Blocking registry client that wraps `reqwest::blocking::Client`.
#[derive(Debug, Clone)]
pub struct HarborClient {
    client: Client,
}

impl HarborClient {
    /// Construct a client whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn request(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
    ) -> RemoteResult<(Url, RequestBuilder)> {
        let url = ctx.endpoint(path)?;
        let request_id = Uuid::new_v4();
        debug!("{method} {url} (request id {request_id})");

        let mut builder = self
            .client
            .request(method, url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(credentials) = ctx.credentials() {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        Ok((url, builder))
    }

    fn send(url: &Url, builder: RequestBuilder) -> RemoteResult<Response> {
        let response = builder.send()?;
        Self::handle_response(url, response)
    }

    fn handle_response(url: &Url, response: Response) -> RemoteResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unable to read body>".into());
            debug!("{url} answered {status}: {body}");
            Err(RemoteFailure::from_status(status, &body))
        }
    }
}

impl GcRemote for HarborClient {
    fn create_gc_schedule(
        &self,
        ctx: &RequestContext,
        request: &GcScheduleRequest,
    ) -> RemoteResult<()> {
        let (url, builder) = self.request(ctx, Method::POST, "system/gc/schedule")?;
        Self::send(&url, builder.json(request))?;
        Ok(())
    }

    fn update_gc_schedule(
        &self,
        ctx: &RequestContext,
        request: &GcScheduleRequest,
    ) -> RemoteResult<()> {
        let (url, builder) = self.request(ctx, Method::PUT, "system/gc/schedule")?;
        Self::send(&url, builder.json(request))?;
        Ok(())
    }

    fn get_gc_schedule(&self, ctx: &RequestContext) -> RemoteResult<GcExecution> {
        let (url, builder) = self.request(ctx, Method::GET, "system/gc/schedule")?;
        let response = Self::send(&url, builder)?;
        Ok(response.json::<GcExecution>()?)
    }

    fn get_gc_history(
        &self,
        ctx: &RequestContext,
        query: &HistoryQuery,
    ) -> RemoteResult<GcHistoryPage> {
        let (url, builder) = self.request(ctx, Method::GET, "system/gc")?;
        let response = Self::send(&url, builder.query(&history_params(query)))?;
        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let executions = response.json::<Vec<GcExecution>>()?;
        Ok(GcHistoryPage { executions, total })
    }

    fn get_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<GcExecution> {
        let (url, builder) = self.request(ctx, Method::GET, &format!("system/gc/{gc_id}"))?;
        let response = Self::send(&url, builder)?;
        Ok(response.json::<GcExecution>()?)
    }

    fn get_gc_log(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<String> {
        let (url, builder) = self.request(ctx, Method::GET, &format!("system/gc/{gc_id}/log"))?;
        let response = Self::send(&url, builder)?;
        Ok(response.text()?)
    }

    fn stop_gc(&self, ctx: &RequestContext, gc_id: i64) -> RemoteResult<()> {
        let (url, builder) = self.request(ctx, Method::PUT, &format!("system/gc/{gc_id}"))?;
        Self::send(&url, builder)?;
        Ok(())
    }
}

/// Query string for the history listing; blank filters are left out.
fn history_params(query: &HistoryQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", query.page.to_string()),
        ("page_size", query.page_size.to_string()),
    ];
    let optional = [("q", &query.query), ("sort", &query.sort)];
    for (key, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            params.push((key, value.to_string()));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_params_skip_blank_filters() {
        let query = HistoryQuery {
            page: 2,
            page_size: 25,
            query: Some("  ".to_string()),
            sort: Some("-creation_time".to_string()),
        };
        assert_eq!(
            history_params(&query),
            vec![
                ("page", "2".to_string()),
                ("page_size", "25".to_string()),
                ("sort", "-creation_time".to_string()),
            ]
        );
    }

    #[test]
    fn history_params_defaults() {
        assert_eq!(
            history_params(&HistoryQuery::default()),
            vec![("page", "1".to_string()), ("page_size", "10".to_string())]
        );
    }

    #[test]
    fn unreachable_server_is_unknown_failure() {
        let client = HarborClient::with_timeout(Duration::from_millis(500)).unwrap();
        let ctx = RequestContext::new("http://127.0.0.1:9", None).unwrap();
        match client.get_gc_log(&ctx, 1) {
            Err(RemoteFailure::Unknown { status: None, .. }) => {}
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
