use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing_actix_web::TracingLogger;

use crate::config::{DatabaseSettings, Settings};
use crate::routes::{
    handle_active_subscription, handle_all_subscriptions, handle_cancel_subscription,
    handle_create_subscription, handle_daily_summary, handle_my_subscriptions,
    handle_toggle_pause, health_check,
};
use crate::storage::{PgSubscriptionStore, SubscriptionStore};

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_connection_db_pool(&config.database);
        let store: Arc<dyn SubscriptionStore> = Arc::new(PgSubscriptionStore::new(db_pool));

        let listener =
            TcpListener::bind(config.get_address()).expect("Failed to bind the address.");
        let port = listener.local_addr().unwrap().port();
        let server = run(listener, store)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    store: Arc<dyn SubscriptionStore>,
) -> Result<Server, std::io::Error> {
    let store: web::Data<dyn SubscriptionStore> = web::Data::from(store);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/subscriptions", web::post().to(handle_create_subscription))
            .route("/subscriptions", web::get().to(handle_my_subscriptions))
            .route("/subscriptions/all", web::get().to(handle_all_subscriptions))
            .route(
                "/subscriptions/active",
                web::get().to(handle_active_subscription),
            )
            .route(
                "/subscriptions/{subscription_id}/pause",
                web::post().to(handle_toggle_pause),
            )
            .route(
                "/subscriptions/{subscription_id}/cancel",
                web::put().to(handle_cancel_subscription),
            )
            .route("/deliveries/summary", web::get().to(handle_daily_summary))
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

pub fn get_connection_db_pool(config: &DatabaseSettings) -> Pool<Postgres> {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(config.get_db_options())
}
