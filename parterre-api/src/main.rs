use std::net::SocketAddr;
use std::sync::Arc;

use axum_extra::extract::cookie::Key;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parterre_api::{app, AppState};
use parterre_booking::ReservationService;
use parterre_catalog::pricing::{FlatPricer, PricingConfig};
use parterre_catalog::venue::grand_theatre_sections;
use parterre_catalog::{Catalog, Show};
use parterre_core::payment::CheckoutUrls;
use parterre_store::{Config, DbClient, SqliteReservationStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parterre_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Parterre API on port {}", config.server.port);

    let db = DbClient::connect(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let store = Arc::new(SqliteReservationStore::new(db.pool.clone()));

    let shows = config
        .shows
        .iter()
        .map(|show| Show {
            id: show.id.clone(),
            title: show.title.clone(),
            date: show.date,
        })
        .collect();
    let catalog = Arc::new(Catalog::new(shows, &grand_theatre_sections()));

    let pricer = Arc::new(FlatPricer::new(PricingConfig {
        base_seat_cents: config.business_rules.base_seat_cents,
        child_on_lap_surcharge_cents: config.business_rules.child_on_lap_surcharge_cents,
        currency: config.business_rules.currency.clone(),
    }));

    let gateway = Arc::new(parterre_api::stripe::StripeCheckout::new(
        config.stripe.secret_key.clone(),
    ));

    let service = Arc::new(ReservationService::new(
        store,
        catalog.clone(),
        pricer,
        gateway,
        config.business_rules.clone(),
    ));

    let state = AppState {
        service,
        catalog,
        checkout_urls: CheckoutUrls {
            success_url: config.stripe.success_url.clone(),
            cancel_url: config.stripe.cancel_url.clone(),
        },
        webhook_secret: config.stripe.webhook_secret.clone(),
        admin_password: config.auth.admin_password.clone(),
        cookie_key: Key::derive_from(config.auth.cookie_secret.as_bytes()),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
