//! HTTP Middleware
//!
//! 非 200 响应的访问日志。业务错误走 {errno, error, data} 信封、
//! 状态码恒为 200，已在 ApiError::into_response() 中记录；
//! 这里只覆盖框架层面产生的 4xx/5xx（路由缺失、请求体超限等）。

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// 4xx/5xx 响应日志中间件，附带请求耗时
pub async fn log_error_responses(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    }

    response
}
