use std::net::SocketAddr;
use std::sync::Arc;

use relay_server::{router, RelayState};

const DEFAULT_PORT: u16 = 8787;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let app = router(Arc::new(RelayState::from_env()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("relay listening on http://{addr}/api/chat");

    axum::serve(listener, app).await
}
