//! Backend entry-point: wires the HTTP surface to the Postgres and
//! catalogue adapters.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use replay_backend::domain::{AccountService, ReviewLifecycleService};
use replay_backend::outbound::catalogue::CatalogueHttpSource;
use replay_backend::outbound::persistence::{
    DbPool, DieselReviewRepository, DieselUserRepository, PoolConfig,
};
use replay_backend::server::{Cli, configure_api, session_middleware};
use replay_backend::inbound::http::HttpState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let key = cli.session_key()?;

    let pool = DbPool::new(PoolConfig::new(cli.database_url.clone()))
        .await
        .map_err(std::io::Error::other)?;

    let catalogue = CatalogueHttpSource::with_timeout(
        cli.catalogue_url.clone(),
        cli.catalogue_key.clone(),
        cli.catalogue_timeout(),
    )
    .map_err(std::io::Error::other)?;

    let accounts = AccountService::new(Arc::new(DieselUserRepository::new(pool.clone())));
    let reviews = ReviewLifecycleService::new(
        Arc::new(DieselReviewRepository::new(pool)),
        Arc::new(catalogue),
    );
    let state = web::Data::new(HttpState::new(
        accounts,
        reviews,
        cli.validation_mode.into(),
    ));

    let cookie_secure = cli.cookie_secure;
    let bind_addr = cli.bind_addr;
    info!(%bind_addr, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(session_middleware(key.clone(), cookie_secure))
            .app_data(state.clone())
            .configure(configure_api)
    })
    .bind(bind_addr)?
    .run()
    .await
}
