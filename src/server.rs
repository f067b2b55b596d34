//! HTTP surface: gallery API plus static files.
//!
//! Routes:
//!
//! - `GET /api/latest`, `POST|PUT /api/latest`: shared single-slot drawing
//! - `POST /api/submit`: `{artist, drawing}` → `{id}`
//! - `GET /api/gallery`: summaries, newest first
//! - `GET /api/artwork/:id`
//! - `GET /api/current`: the artwork now playing
//! - `GET /api/next?secret=`: advance the rotation
//! - `GET /drawings/latest.json`: same as `/api/latest`, falling back to the
//!   sample shipped under the public root
//! - anything else: static files from the public root

use crate::drawing::Drawing;
use crate::ratelimit::RateLimiter;
use crate::store::{Gallery, StoreHandle};
use crate::{Error, Result, ServerConfig};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::io::Read;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Method, Request, Response, Server};
use url::Url;

const JSON: &str = "application/json; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Everything a request handler needs; owned by the composing application.
pub struct AppContext {
    pub store: StoreHandle,
    pub limiter: RateLimiter,
    pub config: ServerConfig,
}

impl AppContext {
    /// Context with the backend selected by `config`.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = config.open_store();
        Self::with_store(config, store)
    }

    /// Context around an explicit backend.
    pub fn with_store(config: ServerConfig, store: Box<dyn Gallery>) -> Result<Self> {
        config.validate()?;
        let store = StoreHandle::spawn(store, config.secret.as_deref())?;
        let limiter = RateLimiter::new(config.submit_limit, config.submit_window);
        Ok(Self {
            store,
            limiter,
            config,
        })
    }
}

/// A response before it is handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub no_store: bool,
}

impl ApiResponse {
    fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Self {
        let mut body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
        body.push(b'\n');
        Self {
            status,
            content_type: JSON,
            body,
            no_store: true,
        }
    }

    fn error(e: &Error) -> Self {
        let status = e.status_code();
        if status >= 500 {
            log::error!("request failed: {}", e);
        }
        Self::json(status, &json!({ "error": error_message(e) }))
    }

    fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: TEXT,
            body: body.as_bytes().to_vec(),
            no_store: false,
        }
    }

    /// Body parsed as JSON (test helper for callers of [`route`]).
    pub fn json_body(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

fn error_message(e: &Error) -> String {
    match e {
        Error::NotFound(what) => what.clone(),
        Error::InvalidShape(_) => "invalid drawing shape".to_string(),
        Error::Serialization(_) => "bad request".to_string(),
        Error::Storage(_) | Error::WorkerGone(_) => "internal error".to_string(),
        other => other.to_string(),
    }
}

#[derive(Deserialize)]
struct SubmitBody {
    #[serde(default)]
    artist: Option<String>,
    drawing: Value,
}

/// Dispatch one request. `body` has already been read and size-checked.
pub fn route(ctx: &AppContext, method: &Method, raw_url: &str, body: &[u8], remote: Option<IpAddr>) -> ApiResponse {
    let url = match Url::parse("http://localhost/").and_then(|base| base.join(raw_url)) {
        Ok(u) => u,
        Err(_) => return ApiResponse::text(400, "bad request\n"),
    };
    let path = url.path();

    if path == "/api" || path.starts_with("/api/") {
        return api(ctx, method, &url, body, remote).unwrap_or_else(|e| ApiResponse::error(&e));
    }
    if !matches!(method, Method::Get | Method::Head) {
        return ApiResponse::text(405, "method not allowed\n");
    }
    if path == "/drawings/latest.json" {
        return latest_json(ctx);
    }
    static_file(ctx, &url)
}

fn api(ctx: &AppContext, method: &Method, url: &Url, body: &[u8], remote: Option<IpAddr>) -> Result<ApiResponse> {
    let path = url.path();
    let store = &ctx.store;
    match (method, path) {
        (Method::Get | Method::Head, "/api/latest") => Ok(ApiResponse::json(200, &store.blocking_latest()?)),
        (Method::Post | Method::Put, "/api/latest") => {
            let value: Value = serde_json::from_slice(body)?;
            let drawing = Drawing::validate(&value).map_err(|e| Error::InvalidShape(e.to_string()))?;
            store.blocking_put_latest(drawing)?;
            Ok(ApiResponse::json(200, &json!({ "ok": true })))
        }
        (Method::Post, "/api/submit") => {
            let req: SubmitBody = serde_json::from_slice(body)?;
            let drawing = Drawing::validate(&req.drawing)
                .map_err(|e| Error::InvalidInput(format!("invalid drawing shape: {}", e)))?;
            // only well-formed submissions count against the client's quota
            if let Some(ip) = remote {
                ctx.limiter.check(ip)?;
            }
            let id = store.blocking_submit(req.artist.as_deref().unwrap_or_default(), drawing)?;
            Ok(ApiResponse::json(200, &json!({ "id": id })))
        }
        (Method::Get | Method::Head, "/api/gallery") => Ok(ApiResponse::json(200, &store.blocking_list()?)),
        (Method::Get | Method::Head, "/api/current") => Ok(ApiResponse::json(200, &store.blocking_current()?)),
        (Method::Get, "/api/next") => {
            let secret = url
                .query_pairs()
                .find(|(k, _)| k == "secret")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            Ok(ApiResponse::json(200, &store.blocking_advance(&secret)?))
        }
        (Method::Get | Method::Head, p) if p.starts_with("/api/artwork/") => {
            let id = &p["/api/artwork/".len()..];
            if id.is_empty() || id.contains('/') {
                return Err(Error::NotFound("not found".into()));
            }
            Ok(ApiResponse::json(200, &store.blocking_artwork(id)?))
        }
        (_, "/api/latest" | "/api/submit" | "/api/gallery" | "/api/current" | "/api/next") => {
            Ok(ApiResponse::json(405, &json!({ "error": "method not allowed" })))
        }
        _ => Err(Error::NotFound("not found".into())),
    }
}

fn latest_json(ctx: &AppContext) -> ApiResponse {
    match ctx.store.blocking_latest() {
        Ok(d) => ApiResponse::json(200, &d),
        Err(Error::NotFound(_)) => {
            let sample = ctx
                .config
                .public_root
                .as_ref()
                .map(|root| root.join("drawings").join("latest.json"))
                .and_then(|p| fs::read_to_string(p).ok());
            match sample {
                Some(text) => ApiResponse::json(200, &Drawing::from_json_str(&text)),
                None => ApiResponse::error(&Error::NotFound("no latest yet".into())),
            }
        }
        Err(e) => ApiResponse::error(&e),
    }
}

/// Resolve a request path under the public root.
///
/// Dot segments were already resolved by URL parsing. Each remaining segment
/// is percent-decoded and must still be a single plain name: no separators,
/// no NUL, not hidden.
fn resolve_static(root: &std::path::Path, url: &Url) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for seg in url.path_segments()?.filter(|s| !s.is_empty()) {
        let name = percent_decode_str(seg).decode_utf8().ok()?;
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\', '\0']) {
            return None;
        }
        path.push(&*name);
    }
    Some(path)
}

fn static_file(ctx: &AppContext, url: &Url) -> ApiResponse {
    let not_found = || ApiResponse::text(404, "not found\n");
    let Some(root) = ctx.config.public_root.as_deref() else {
        return not_found();
    };
    let Some(mut path) = resolve_static(root, url) else {
        return not_found();
    };
    if path.is_dir() {
        path.push("index.html");
    }
    match fs::read(&path) {
        Ok(body) => ApiResponse {
            status: 200,
            content_type: content_type(&path),
            body,
            no_store: false,
        },
        Err(_) => not_found(),
    }
}

fn content_type(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => JSON,
        _ => "application/octet-stream",
    }
}

fn read_body(reader: &mut dyn Read, limit: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    Read::take(reader, limit as u64 + 1).read_to_end(&mut body)?;
    if body.len() > limit {
        return Err(Error::PayloadTooLarge(limit));
    }
    Ok(body)
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Read, dispatch and answer one request.
pub fn handle(ctx: &AppContext, mut request: Request) {
    let method = request.method().clone();
    let raw_url = request.url().to_string();
    let remote = request.remote_addr().map(|a| a.ip());

    let body = if matches!(method, Method::Post | Method::Put) {
        read_body(request.as_reader(), ctx.config.body_limit)
    } else {
        Ok(Vec::new())
    };
    let resp = match body {
        Ok(body) => route(ctx, &method, &raw_url, &body, remote),
        Err(e) => ApiResponse::error(&e),
    };
    log::info!("{} {} -> {}", method, raw_url, resp.status);

    let mut response = Response::from_data(resp.body).with_status_code(resp.status);
    let mut headers = vec![
        ("Content-Type", resp.content_type),
        ("X-Content-Type-Options", "nosniff"),
        ("X-Frame-Options", "DENY"),
        ("Referrer-Policy", "no-referrer"),
    ];
    if resp.no_store {
        headers.push(("Cache-Control", "no-store, max-age=0"));
    }
    for (name, value) in headers {
        if let Some(h) = header(name, value) {
            response.add_header(h);
        }
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response: {}", e);
    }
}

/// Spawn `workers` threads answering requests from `server`.
pub fn serve(server: Arc<Server>, ctx: Arc<AppContext>, workers: usize) -> Vec<JoinHandle<()>> {
    (0..workers.max(1))
        .map(|i| {
            let server = Arc::clone(&server);
            let ctx = Arc::clone(&ctx);
            thread::Builder::new()
                .name(format!("http-{}", i))
                .spawn(move || loop {
                    match server.recv() {
                        Ok(request) => handle(&ctx, request),
                        Err(e) => {
                            log::error!("listener failed: {}", e);
                            break;
                        }
                    }
                })
        })
        .filter_map(|r| r.map_err(|e| log::error!("failed to spawn worker: {}", e)).ok())
        .collect()
}

/// Bind, serve until the listener fails.
pub fn run(config: ServerConfig) -> Result<()> {
    let workers = config.workers;
    let addr = config.addr();
    let ctx = Arc::new(AppContext::new(config)?);
    let server = Server::http(&addr).map_err(|e| Error::ConfigError(format!("cannot bind {}: {}", addr, e)))?;
    log::info!("unicorn-draw listening on {}", addr);
    if ctx.config.ephemeral {
        log::info!("ephemeral store: nothing is written to disk");
    } else {
        log::info!("DATA_DIR={}", ctx.config.data_dir.display());
    }
    if ctx.config.secret.is_none() {
        log::warn!("no rotation secret configured; /api/next is disabled");
    }

    for handle in serve(Arc::new(server), ctx, workers) {
        let _ = handle.join();
    }
    Ok(())
}
