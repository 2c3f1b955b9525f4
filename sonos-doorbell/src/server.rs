//! HTTP surface: `/ring` and the chime file.

use std::convert::Infallible;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use warp::http::StatusCode;
use warp::hyper::Body;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

use crate::error::{DoorbellError, Result};
use crate::Doorbell;

const CHIME_CACHE_CONTROL: &str = "public, must-revalidate, max-age=0";
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// The doorbell's HTTP server
///
/// Any GET whose path ends in `/ring` rings every device and answers with
/// the reports as JSON; any GET ending in `/doorbell.mp3` serves the chime.
/// Everything else is an empty 404.
pub struct DoorbellServer {
    addr: SocketAddr,
    shutdown_tx: Option<mpsc::Sender<()>>,
    server_handle: Option<tokio::task::JoinHandle<()>>,
}

impl DoorbellServer {
    /// Bind `0.0.0.0:port` and start serving; port 0 picks a free port
    pub async fn start(doorbell: Arc<Doorbell>, port: u16) -> Result<Self> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let (addr, server) = warp::serve(routes(doorbell))
            .try_bind_with_graceful_shutdown(
                SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
                async move {
                    shutdown_rx.recv().await;
                },
            )
            .map_err(|e| DoorbellError::Server(e.to_string()))?;

        info!(%addr, "HTTP server listening");
        let server_handle = tokio::spawn(server);

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    /// The bound address
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.server_handle.take() {
            if let Err(e) = handle.await {
                error!(error = %e, "HTTP server task failed");
            }
        }
    }
}

/// All routes, with every rejection turned into an empty 404
pub fn routes(
    doorbell: Arc<Doorbell>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let with_doorbell = warp::any().map(move || Arc::clone(&doorbell));

    warp::get()
        .and(warp::path::full())
        .and(warp::header::optional::<String>("if-modified-since"))
        .and(with_doorbell)
        .and_then(dispatch)
        .recover(handle_rejection)
}

async fn dispatch(
    path: warp::path::FullPath,
    if_modified_since: Option<String>,
    doorbell: Arc<Doorbell>,
) -> std::result::Result<Response, Rejection> {
    let path = path.as_str();
    if path.ends_with("/ring") {
        Ok(ring(&doorbell).await)
    } else if path.ends_with("/doorbell.mp3") {
        chime(&doorbell.config().chime_path, if_modified_since.as_deref()).await
    } else {
        Err(warp::reject::not_found())
    }
}

async fn ring(doorbell: &Doorbell) -> Response {
    info!("doorbell rung");

    let reports = match doorbell.ring_all().await {
        Ok(reports) => reports,
        Err(e) => {
            error!(error = %e, "ring aborted");
            return status_only(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match serde_json::to_vec_pretty(&reports) {
        Ok(json) => {
            let mut response = with_body(StatusCode::OK, Bytes::from(json));
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            response
        }
        Err(e) => {
            error!(error = %e, "could not encode ring reports");
            status_only(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn chime(path: &Path, if_modified_since: Option<&str>) -> std::result::Result<Response, Rejection> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => {
            warn!(path = %path.display(), "chime path is not a file");
            return Err(warp::reject::not_found());
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "chime file not found");
            return Err(warp::reject::not_found());
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "cannot read chime file");
            return Ok(status_only(StatusCode::INTERNAL_SERVER_ERROR));
        }
    };

    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
    if let (Some(modified), Some(since)) = (modified, if_modified_since.and_then(parse_http_date)) {
        if !modified_since(modified, since) {
            let mut response = status_only(StatusCode::NOT_MODIFIED);
            add_chime_headers(&mut response, Some(modified));
            return Ok(response);
        }
    }

    let body = match tokio::fs::read(path).await {
        Ok(body) => body,
        Err(e) => {
            error!(path = %path.display(), error = %e, "cannot read chime file");
            return Ok(status_only(StatusCode::INTERNAL_SERVER_ERROR));
        }
    };

    let mut response = with_body(StatusCode::OK, Bytes::from(body));
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("audio/mpeg"));
    add_chime_headers(&mut response, modified);
    Ok(response)
}

fn add_chime_headers(response: &mut Response, modified: Option<DateTime<Utc>>) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CHIME_CACHE_CONTROL));
    if let Some(value) = modified.and_then(|m| HeaderValue::from_str(&format_http_date(m)).ok()) {
        headers.insert(LAST_MODIFIED, value);
    }
}

/// HTTP dates have whole-second precision, so sub-second changes don't count
fn modified_since(modified: DateTime<Utc>, since: DateTime<Utc>) -> bool {
    modified.timestamp() > since.timestamp()
}

fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE).to_string()
}

fn parse_http_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn with_body(status: StatusCode, body: Bytes) -> Response {
    let length = body.len() as u64;
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn status_only(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    if !err.is_not_found() {
        warn!(rejection = ?err, "request rejected");
    }
    Ok(status_only(StatusCode::NOT_FOUND))
}
