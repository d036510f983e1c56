use std::sync::Arc;

use anyhow::Result;
use celo_imoveis::{config, db, logger, web};
use log::info;
use tokio::sync::broadcast;

#[tokio::main]
async fn main() -> Result<()> {
    logger::setup_logger()?;

    let config = Arc::new(config::read_config());

    // Bring the schema up before accepting traffic; safe on every start.
    let mut conn = db::connect(&config)?;
    db::init_schema(&mut conn)?;
    drop(conn);

    let state = web::AppState::new(config)?;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(());
        }
    });

    web::start_http_server(state, shutdown_rx).await
}
