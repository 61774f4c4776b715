use axum::{http::StatusCode, routing::get, Router};
use complaints_core::core::config::Config;
use complaints_core::core::extractor::PublicOrigin;
use complaints_core::core::openapi::{ApiDoc, SwaggerInfoModifier};
use complaints_core::core::{database, middleware};
use complaints_core::features::complaints::{
    routes as complaints_routes, upload_routes, ComplaintService, PgComplaintRepository,
};
use complaints_core::modules::storage::LocalDiskStorage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?
        .block_on(run(worker_threads))
}

async fn run(worker_threads: usize) -> anyhow::Result<()> {
    // .env must be loaded before the subscriber reads RUST_LOG
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        "Configuration loaded (worker_threads={}, pid={})",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database)?;
    tracing::info!(
        "Database pool created for {}",
        config.database.redacted_url()
    );

    // An unreachable store at boot is logged; requests fail individually later
    match database::run_migrations(&pool).await {
        Ok(()) => tracing::info!("Database migrations applied"),
        Err(e) => tracing::error!("Database migrations failed, serving anyway: {}", e),
    }

    let storage = Arc::new(
        LocalDiskStorage::new(
            config.storage.upload_dir.clone(),
            config.storage.max_file_size,
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare upload directory: {}", e))?,
    );

    let repository = Arc::new(PgComplaintRepository::new(pool));
    let complaint_service = Arc::new(ComplaintService::new(repository, Arc::clone(&storage)));
    tracing::info!("Complaint service initialized");

    let app = build_app(&config, complaint_service, &storage);

    let addr = config.app.server_address();
    let listener = bind_listener(&addr)?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_app(
    config: &Config,
    complaint_service: Arc<ComplaintService>,
    storage: &LocalDiskStorage,
) -> Router {
    let mut openapi = ApiDoc::openapi();
    SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    }
    .modify(&mut openapi);

    let origin = PublicOrigin::new(
        config.app.public_base_url.clone(),
        config.app.fallback_host(),
    );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(complaints_routes(
            complaint_service,
            origin,
            config.app.max_request_body_size,
        ))
        .merge(upload_routes(storage.base_path()))
        .route("/health", get(|| async { StatusCode::OK }))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        .layer(PropagateRequestIdLayer::new(middleware::REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(
            middleware::REQUEST_ID_HEADER,
            middleware::MakeRequestUuid,
        ))
}

/// TCP listener with address reuse, no-delay and keepalive set
fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;
    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;
    socket.set_tcp_keepalive(&socket2::TcpKeepalive::new().with_time(Duration::from_secs(60)))?;
    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}
