use super::build::build_into;
use crate::project::Project;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::header,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::broadcast;
use tower_http::{services::ServeDir, trace::TraceLayer};

const EVENTS_PATH: &str = "/_blogkit/events";

const RELOAD_JS: &str = r#"// Hot reload via Server-Sent Events
const source = new EventSource('/_blogkit/events');
source.onmessage = () => {
    console.log('Reloading...');
    location.reload();
};
source.onerror = () => {
    console.log('Preview server disconnected');
    source.close();
};
"#;

/// Quiet period after a change before rebuilding, so one save that fires
/// several filesystem events triggers a single rebuild.
const DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Clone)]
struct AppState {
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// Builds the blog into a temporary directory, serves it, and rebuilds on
/// every change to the project. Open pages reload through an SSE stream.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📝 Starting preview server...");
    println!("   Blog: {}", path.display());

    let project = Project::load(&path)?;
    let output = tempfile::Builder::new()
        .prefix("blogkit-preview")
        .tempdir()
        .context("Failed to create preview directory")?;
    let pages = build_into(&project, output.path(), &project.theme.clone().live_reload(true))?;

    println!("   ✓ Loaded: {}", project.config.site.name);
    println!("   ✓ Rendered {} pages", pages);

    // Create broadcast channel for reload events
    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        reload_tx: reload_tx.clone(),
    };

    let app = Router::new()
        .route(EVENTS_PATH, get(sse_handler))
        .route(
            blogkit_generator::components::RELOAD_SCRIPT_PATH,
            get(reload_script),
        )
        .fallback_service(ServeDir::new(output.path()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start file watcher; notify reports absolute paths
    let root = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let ignored = root.join(&project.config.build.output_dir);
    let output_dir: Arc<Path> = Arc::from(output.path());
    tokio::spawn(async move {
        if let Err(e) = watch_files(root, ignored, output_dir, reload_tx).await {
            eprintln!("File watcher error: {:#}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    // The preview directory lives until the server stops
    drop(output);
    Ok(())
}

/// Watch the project, rebuild on changes and trigger reload
async fn watch_files(
    root: PathBuf,
    ignored: PathBuf,
    output: Arc<Path>,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        if !is_relevant(&event, &ignored) {
            continue;
        }
        tracing::debug!(paths = ?event.paths, "filesystem change");

        tokio::time::sleep(DEBOUNCE).await;
        while rx.try_recv().is_ok() {}

        println!("   📝 Change detected, rebuilding...");
        let root = root.clone();
        let output = Arc::clone(&output);
        let rebuilt = tokio::task::spawn_blocking(move || -> Result<usize> {
            let project = Project::load(&root)?;
            build_into(&project, &output, &project.theme.clone().live_reload(true))
        })
        .await?;

        match rebuilt {
            Ok(pages) => {
                println!("   ✓ Rendered {} pages", pages);
                let _ = reload_tx.send(());
            }
            Err(e) => eprintln!("   ⚠ Rebuild failed: {:#}", e),
        }
    }

    Ok(())
}

/// Content changes matter; editor temp files, dotfiles and build output don't
fn is_relevant(event: &NotifyEvent, ignored: &Path) -> bool {
    let kind_matches = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    kind_matches
        && event.paths.iter().any(|p| {
            let filename = p.file_name().unwrap_or_default().to_string_lossy();
            !filename.starts_with('.') && !filename.ends_with('~') && !p.starts_with(ignored)
        })
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn reload_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], RELOAD_JS)
}
