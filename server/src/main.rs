use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::{
    BookingRequestRouter, BookingRouter, FeedRouter, ItemRouter, LoanRouter, VenueRouter,
};
use application::service::{SeedItemService, SyncVenueService};
use error_stack::ResultExt;
use kernel::KernelError;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod auth;
mod catalog;
mod config;
mod controller;
mod error;
mod extract;
mod handler;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "driver=debug,application=debug,server=debug,tower_http=debug,sqlx=info"
                            .into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let settings = Settings::from_env()?;
    let catalog = Catalog::load(settings.catalog_path.as_deref())?;

    let app = AppModule::new(&settings).await?;
    app.sync_venues(catalog.venues()).await?;
    let seeded = app.seed_items(catalog.items()).await?;
    tracing::info!("Catalog ready, {} item(s) seeded", seeded);

    let router = axum::Router::new()
        .route_venue()
        .route_booking()
        .route_booking_request()
        .route_item()
        .route_loan()
        .route_feed()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app);

    let tcp = TcpListener::bind(settings.bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!("Listening on {}", settings.bind);

    axum::serve(tcp, router.into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}
