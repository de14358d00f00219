//! HTTP serving of a compiled site.
//!
//! Built on `tiny_http`, single-threaded:
//!
//! ```text
//! ┌──────────────┐  GET /post   ┌──────────────────────────────┐
//! │   request    │ ───────────▶ │ SiteHandler                  │
//! └──────────────┘              │   routes["/post"]            │
//!                               │     └─▶ <tmp>/post.html      │
//!                               └──────────────────────────────┘
//! ```
//!
//! - [`SiteHandler`] serves a site compiled once into a private temporary
//!   directory. The directory lives until [`SiteHandler::destroy`].
//! - [`LiveHandler`] re-parses and recompiles the whole tree for every
//!   request, then destroys the temporary directory right after responding.
//!
//! Only `GET` is served. Ctrl+C unblocks the server loop.

use crate::{area::route_key, config::SiteConfig, log, site::Site};
use anyhow::{Context, Result, anyhow};
use std::{
    borrow::Cow,
    collections::BTreeMap,
    fs,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempDir;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Handlers
// ============================================================================

/// Routes of a compiled site and the temporary directory backing them.
pub struct SiteHandler {
    routes: BTreeMap<String, PathBuf>,
    dir: TempDir,
}

impl SiteHandler {
    pub(crate) fn new(routes: BTreeMap<String, PathBuf>, dir: TempDir) -> Self {
        Self { routes, dir }
    }

    /// Link path -> generated file.
    pub fn routes(&self) -> &BTreeMap<String, PathBuf> {
        &self.routes
    }

    /// Temporary directory holding the generated files.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// File served for the raw request `url`.
    ///
    /// The query string is dropped, percent-escapes are decoded and a
    /// trailing slash is ignored.
    pub fn resolve(&self, url: &str) -> Option<&Path> {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let path = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
        self.routes.get(route_key(&path)).map(PathBuf::as_path)
    }

    /// Answer one request.
    pub fn respond(&self, request: Request) -> Result<()> {
        if *request.method() != Method::Get {
            return respond_status(request, 405, "405 Method Not Allowed");
        }
        match self.resolve(request.url()) {
            Some(path) => serve_file(request, path),
            None => respond_status(request, 404, "404 Not Found"),
        }
    }

    /// Delete the temporary directory and everything under it.
    pub fn destroy(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .with_context(|| format!("cannot remove `{}`", path.display()))
    }
}

/// Recompiles the site for every request.
#[derive(Debug, Clone)]
pub struct LiveHandler {
    pub source: PathBuf,
    pub theme: PathBuf,
    pub style: String,
}

impl LiveHandler {
    pub fn respond(&self, request: Request) -> Result<()> {
        let handler = match Site::parse(&self.source, &self.style)
            .and_then(|site| site.handler(&self.theme))
        {
            Ok(handler) => handler,
            Err(err) => {
                log!("error"; "{err:#}");
                return respond_status(request, 500, &format!("{err:#}"));
            }
        };

        let result = handler.respond(request);
        handler.destroy()?;
        result
    }
}

enum Handler {
    Compiled(SiteHandler),
    Live(LiveHandler),
}

impl Handler {
    fn respond(&self, request: Request) -> Result<()> {
        match self {
            Self::Compiled(handler) => handler.respond(request),
            Self::Live(handler) => handler.respond(request),
        }
    }

    fn destroy(self) -> Result<()> {
        match self {
            Self::Compiled(handler) => handler.destroy(),
            Self::Live(_) => Ok(()),
        }
    }
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Compile the configured site and serve it until Ctrl+C.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    let build = &config.build;
    let handler = if config.serve.live {
        Handler::Live(LiveHandler {
            source: build.source.clone(),
            theme: build.theme.clone(),
            style: build.style.clone(),
        })
    } else {
        let site = Site::parse(&build.source, &build.style)?;
        Handler::Compiled(site.handler(&build.theme)?)
    };

    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("invalid interface `{}`", config.serve.interface))?;
    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    let mode = if config.serve.live { " (live)" } else { "" };
    log!("serve"; "http://{addr}{mode}");

    for request in server.incoming_requests() {
        if let Err(e) = handler.respond(request) {
            log!("serve"; "request error: {e:#}");
        }
    }

    handler.destroy()
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts starting at port {}: {}",
        max_retries,
        base_port,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header `{value}`"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// Plain text response with `status`.
fn respond_status(request: Request, status: u16, body: &str) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(content_type("text/plain; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Tests
// ============================================================================
