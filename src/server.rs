use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};

use crate::{
    config::Config,
    encode::{artifact::ScratchSpace, renderer::Mp4Renderer},
    http::{AppState, router::create_router},
    service::VideoGenerator,
    source::handle::ImageSourceHandle,
};

/// Assemble the generator from configuration. The image source is loaded here, once.
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let spec = config
        .animation
        .to_spec()
        .context("invalid animation settings")?;
    let scratch = ScratchSpace::new(&config.storage.scratch_dir)
        .context("prepare scratch directory")?;
    info!(dir = %scratch.dir().display(), "scratch directory ready");

    if !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        warn!("ffmpeg was not found on PATH; video requests will fail until it is installed");
    }

    let source = Arc::new(ImageSourceHandle::load(&config.image_source).await);
    let renderer = Arc::new(Mp4Renderer::new(scratch, config.animation.threading()));
    let generator = Arc::new(VideoGenerator::new(source, renderer, spec));
    info!(
        frames = generator.spec().frame_count(),
        fps = generator.spec().fps().get(),
        "video generator ready"
    );

    Ok(AppState::new(generator)
        .with_request_timeout(config.server.request_timeout_secs.map(Duration::from_secs)))
}

/// Serve until Ctrl+C / SIGTERM, then release the image source.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;
    let source = Arc::clone(state.generator.source());

    let app = create_router(state, config.server.cors_origin.as_deref());
    let listener = TcpListener::bind(config.server_address())
        .await
        .with_context(|| format!("bind {}", config.server_address()))?;
    info!("server listening on http://{}", config.server_address());

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match Arc::try_unwrap(source) {
        Ok(handle) => handle.shutdown(),
        Err(_) => warn!("image source still referenced at shutdown"),
    }

    if let Err(e) = result {
        error!("server error: {e}");
        return Err(e.into());
    }

    info!("server shutdown completed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {e}");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("received Ctrl+C signal, starting graceful shutdown...");
        },
        () = terminate => {
            info!("received terminate signal, starting graceful shutdown...");
        },
    }
}
