//! Volley server binary.
//!
//! Configuration comes from the environment:
//!
//! | Variable                | Default          | Meaning                      |
//! |-------------------------|------------------|------------------------------|
//! | `VOLLEY_BIND`           | `127.0.0.1:8080` | Listener address             |
//! | `VOLLEY_ALLOWED_ORIGIN` | unset            | Exact Origin header to allow |
//! | `RUST_LOG`              | `info`           | Tracing filter directives    |

use tracing_subscriber::EnvFilter;
use volley_server::VolleyServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("VOLLEY_BIND")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let mut builder = VolleyServer::builder().bind(&bind);
    if let Ok(origin) = std::env::var("VOLLEY_ALLOWED_ORIGIN") {
        builder = builder.allowed_origin(&origin);
    }

    let server = builder.build().await?;
    let session = server.session();

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
            let _ = session.shutdown().await;
        }
    }

    Ok(())
}
