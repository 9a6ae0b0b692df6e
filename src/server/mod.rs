//! Development server with live reload
//!
//! Pages are rendered on demand from an in-memory [`Site`]; files under
//! `static_dir` are served as they are. In watch mode the site is reloaded
//! when content or configuration changes and connected browsers are told to
//! refresh.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::render::PageRenderer;
use crate::site::Site;
use crate::Blog;

/// How to run the server
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub ip: String,
    pub port: u16,
    /// Reload on file changes and inject the live reload client
    pub watch: bool,
    pub open: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
            watch: true,
            open: false,
        }
    }
}

/// The parts of the server that a reload replaces together
struct Live {
    site: Site,
    static_dir: PathBuf,
}

/// Server state
pub struct ServerState {
    live: RwLock<Live>,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
}

impl ServerState {
    pub fn new(site: Site, static_dir: PathBuf, live_reload: bool) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(16);
        Self {
            live: RwLock::new(Live { site, static_dir }),
            reload_tx,
            live_reload,
        }
    }

    /// Render the page at `path`, if there is one
    pub async fn render(&self, path: &str) -> Option<String> {
        let live = self.live.read().await;
        let ctx = live.site.context_for(path)?;
        Some(self.renderer(&live.site).render(&ctx))
    }

    /// Render the not-found page
    pub async fn render_not_found(&self, path: &str) -> String {
        let live = self.live.read().await;
        self.renderer(&live.site).render_not_found(path)
    }

    /// Directory static files are currently served from
    pub async fn static_dir(&self) -> PathBuf {
        self.live.read().await.static_dir.clone()
    }

    /// Swap in a freshly loaded site and its static directory, then notify
    /// live reload clients
    pub async fn replace_site(&self, site: Site, static_dir: PathBuf) {
        *self.live.write().await = Live { site, static_dir };
        let _ = self.reload_tx.send(());
    }

    fn renderer(&self, site: &Site) -> PageRenderer {
        PageRenderer::new(site.config().clone()).with_livereload(self.live_reload)
    }
}

/// Build the router for a server state
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(blog: &Blog, options: &ServeOptions) -> Result<()> {
    let site = Site::load(blog)?;
    let state = Arc::new(ServerState::new(
        site,
        blog.static_dir.clone(),
        options.watch,
    ));

    let app = router(state.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if options.ip == "localhost" {
        "127.0.0.1"
    } else {
        options.ip.as_str()
    };
    let addr: SocketAddr = format!("{}:{}", bind_ip, options.port).parse()?;

    let url = format!("http://{}:{}", options.ip, options.port);
    println!("Server running at {}", url);
    if options.watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if options.open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    if options.watch {
        let blog = blog.clone();
        let handle = tokio::runtime::Handle::current();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = watch_and_reload(&blog, &state, &handle) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch content and configuration, reloading the site on change
fn watch_and_reload(
    blog: &Blog,
    state: &ServerState,
    handle: &tokio::runtime::Handle,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if blog.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&blog.content_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", blog.content_dir);
    }

    let config_path = blog.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    let mut current = blog.clone();
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Configuration may have moved directories, so start over
                let reloaded = Blog::new(&current.base_dir).and_then(|fresh| {
                    let site = Site::load(&fresh)?;
                    Ok((fresh, site))
                });

                match reloaded {
                    Ok((fresh, site)) => {
                        if fresh.content_dir != current.content_dir {
                            let _ = debouncer.watcher().unwatch(&current.content_dir);
                            let watched = debouncer
                                .watcher()
                                .watch(&fresh.content_dir, RecursiveMode::Recursive);
                            match watched {
                                Ok(()) => tracing::info!("Now watching: {:?}", fresh.content_dir),
                                Err(e) => tracing::warn!(
                                    "Cannot watch {:?}: {}",
                                    fresh.content_dir,
                                    e
                                ),
                            }
                        }
                        handle.block_on(state.replace_site(site, fresh.static_dir.clone()));
                        current = fresh;
                        tracing::info!("Site reloaded");
                    }
                    Err(e) => tracing::error!("Reload failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Editor and VCS noise does not trigger a reload
pub(crate) fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Render site pages, then fall back to static files, then 404
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();

    if let Some(html) = state.render(&path).await {
        return Html(html).into_response();
    }

    let mut service = ServeDir::new(state.static_dir().await);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => {
            tracing::debug!("Not found: {}", path);
            let html = state.render_not_found(&path).await;
            (StatusCode::NOT_FOUND, Html(html)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
