//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: liveness probe, function route
//! matching, method validation, body collection and access logging.

use crate::config::AppState;
use crate::function::{self, request, ExecutionContext, HttpRequestMessage};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Outcome of routing one request; `invocation_id` is set when the function ran
struct Routed {
    response: Response<Full<Bytes>>,
    invocation_id: Option<String>,
}

impl From<Response<Full<Bytes>>> for Routed {
    fn from(response: Response<Full<Bytes>>) -> Self {
        Self {
            response,
            invocation_id: None,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let logging = &state.config.logging;

    logger::log_headers_count(req.headers().len(), logging.show_headers);
    let access_entry = logging
        .access_log
        .then(|| access_log_entry(&req, peer_addr));

    let routed = route_request(req, &state).await;
    let mut response = routed.response;

    match HeaderValue::from_str(&state.config.http.server_name) {
        Ok(server) => {
            response.headers_mut().insert(SERVER, server);
        }
        Err(_) => logger::log_warning("http.server_name is not a valid header value"),
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.invocation_id = routed.invocation_id;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &logging.access_log_format);
    }

    Ok(response)
}

fn access_log_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

/// Route request based on path and method
async fn route_request<B>(req: Request<B>, state: &Arc<AppState>) -> Routed
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path();
    let health = &state.config.health;

    // 0. Liveness probe (answered without touching the function)
    if health.enabled && path == health.liveness_path {
        return match method {
            Method::GET | Method::HEAD => http::build_health_response("ok").into(),
            _ => http::build_405_response("GET, HEAD").into(),
        };
    }

    // 1. Anything other than the function route
    if !state.is_function_route(path) {
        return http::build_404_response().into();
    }

    // 2. Method check
    match method {
        Method::GET | Method::POST => invoke_function(req, state).await,
        Method::OPTIONS => http::build_options_response(state.config.http.enable_cors).into(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(http::FUNCTION_METHODS).into()
        }
    }
}

/// Collect the request body and run the function
async fn invoke_function<B>(req: Request<B>, state: &Arc<AppState>) -> Routed
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let max_body_size = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return resp.into();
    }

    let (parts, body) = req.into_parts();
    let body = if request::declares_body(&parts.headers) {
        match read_body(body, max_body_size).await {
            Ok(bytes) => Some(bytes),
            Err(resp) => return resp.into(),
        }
    } else {
        None
    };

    let message = HttpRequestMessage::from_parts(&parts, body);
    let context = ExecutionContext::new(&state.config.function.name);
    let mut response = function::run(&message, &context).into_response();

    if state.config.http.enable_cors {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }

    Routed {
        response,
        invocation_id: Some(context.invocation_id().to_string()),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', relying on streamed limit"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Collect a body, enforcing the size limit on the bytes actually received
async fn read_body<B>(body: B, max_body_size: u64) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while streaming"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::function::MISSING_NAME_ERROR;
    use http_body_util::Empty;
    use hyper::body::Frame;
    use hyper::StatusCode;
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    fn state_with(config: Config) -> Arc<AppState> {
        Arc::new(AppState::new(&config))
    }

    fn state() -> Arc<AppState> {
        let mut config = Config::default();
        config.logging.access_log = false;
        state_with(config)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send<B>(req: Request<B>, state: Arc<AppState>) -> (StatusCode, hyper::HeaderMap, String)
    where
        B: Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let resp = handle_request(req, state, peer()).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Empty<Bytes>> {
        Request::builder().uri(uri).body(Empty::new()).unwrap()
    }

    fn post(uri: &str, body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-length", body.len())
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_without_name_is_bad_request() {
        let (status, headers, body) = send(get("/api/HttpExample"), state()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers["content-type"], "application/json");
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], MISSING_NAME_ERROR);
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_get_with_query_name() {
        let (status, _, body) = send(get("/api/HttpExample?name=Alice"), state()).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["message"], "Hello, Alice");
        assert_eq!(json["name"], "Alice");
    }

    #[tokio::test]
    async fn test_post_body_wins_over_query() {
        let (status, _, body) = send(post("/api/HttpExample?name=Alice", "Bob"), state()).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["method"], "POST");
    }

    #[tokio::test]
    async fn test_post_empty_body_greets_empty_name() {
        let (status, _, body) = send(post("/api/HttpExample?name=Alice", ""), state()).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "");
    }

    #[tokio::test]
    async fn test_body_without_framing_is_ignored() {
        let req = Request::builder()
            .uri("/api/HttpExample?name=Alice")
            .body(Full::new(Bytes::from_static(b"Bob")))
            .unwrap();
        let (_, _, body) = send(req, state()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Alice");
    }

    #[tokio::test]
    async fn test_route_is_case_insensitive() {
        let (status, _, _) = send(get("/API/httpexample?name=x"), state()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, _, _) = send(get("/api/Other"), state()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let req = Request::builder()
            .method(Method::DELETE)
            .uri("/api/HttpExample?name=x")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let (status, headers, _) = send(req, state()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers["allow"], http::FUNCTION_METHODS);
    }

    #[tokio::test]
    async fn test_options_preflight_with_cors() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.http.enable_cors = true;
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/HttpExample")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let (status, headers, _) = send(req, state_with(config)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(headers["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_options_without_cors() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/HttpExample")
            .body(Empty::<Bytes>::new())
            .unwrap();
        let (status, headers, body) = send(req, state()).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(headers["allow"], http::FUNCTION_METHODS);
        assert!(!headers.contains_key("access-control-allow-origin"));
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_cors_header_on_function_response() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.http.enable_cors = true;
        let (_, headers, _) = send(get("/api/HttpExample?name=x"), state_with(config)).await;
        assert_eq!(headers["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_server_header() {
        let (_, headers, _) = send(get("/api/HttpExample?name=x"), state()).await;
        assert_eq!(headers["server"], "greeting-handler");
    }

    #[tokio::test]
    async fn test_declared_length_over_limit() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.http.max_body_size = 4;
        let (status, _, _) = send(post("/api/HttpExample", "too long"), state_with(config)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_streamed_body_over_limit() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.http.max_body_size = 4;

        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/HttpExample")
            .header("transfer-encoding", "chunked")
            .body(chunked(&["ab", "cd", "ef"]))
            .unwrap();
        let (status, _, _) = send(req, state_with(config)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_chunked_body_is_read() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/HttpExample")
            .header("transfer-encoding", "chunked")
            .body(chunked(&["Gr", "ace"]))
            .unwrap();
        let (status, _, body) = send(req, state()).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Grace");
    }

    #[tokio::test]
    async fn test_unreadable_body_is_bad_request() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/HttpExample?name=Alice")
            .header("transfer-encoding", "chunked")
            .body(FailingBody { sent_first: false })
            .unwrap();
        let (status, headers, body) = send(req, state()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers["content-type"], "text/plain");
        // Plain text rather than the function's JSON: the function never ran
        assert_eq!(body, "400 Bad Request");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _, body) = send(get("/healthz"), state()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_health_endpoint_disabled() {
        let mut config = Config::default();
        config.logging.access_log = false;
        config.health.enabled = false;
        let (status, _, _) = send(get("/healthz"), state_with(config)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_access_log_enabled_does_not_alter_response() {
        let mut config = Config::default();
        config.logging.access_log_format = "json".to_string();
        let (status, _, _) = send(get("/api/HttpExample?name=x"), state_with(config)).await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Body delivering its chunks one frame at a time, like a chunked upload
    struct ChunkedBody {
        chunks: VecDeque<Bytes>,
    }

    impl Body for ChunkedBody {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, Infallible>>> {
            Poll::Ready(self.chunks.pop_front().map(|chunk| Ok(Frame::data(chunk))))
        }
    }

    fn chunked(chunks: &[&'static str]) -> ChunkedBody {
        ChunkedBody {
            chunks: chunks
                .iter()
                .map(|c| Bytes::from_static(c.as_bytes()))
                .collect(),
        }
    }

    /// Body that yields one chunk and then fails, like a connection reset mid-upload
    struct FailingBody {
        sent_first: bool,
    }

    impl Body for FailingBody {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Bytes>, std::io::Error>>> {
            if self.sent_first {
                Poll::Ready(Some(Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ))))
            } else {
                self.sent_first = true;
                Poll::Ready(Some(Ok(Frame::data(Bytes::from_static(b"Bo")))))
            }
        }
    }
}
