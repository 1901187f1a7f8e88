use std::process;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use bookstore_api::config::Config;
use bookstore_api::handlers;
use bookstore_api::session::SessionRegistry;
use bookstore_api::store::{self, MySqlStore, Store};

const DB_PROBE_ATTEMPTS: u32 = 15;
const DB_PROBE_DELAY: Duration = Duration::from_secs(2);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    let store: Arc<dyn Store> = Arc::new(MySqlStore::new(&config));

    // Never bind the listener while the database is unreachable.
    if !store::wait_for_db(store.as_ref(), DB_PROBE_ATTEMPTS, DB_PROBE_DELAY).await {
        error!("database not ready, server not started");
        process::exit(1);
    }

    let store = web::Data::from(store);
    let sessions = web::Data::new(SessionRegistry::new());

    info!(port = config.port, "server starting");
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(sessions.clone())
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
