use edgex_admin::{app, config::Settings};
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(production: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("edgex_admin=info"));

    // JSON for log shipping in production, human-readable otherwise.
    let (json, pretty) = if production {
        (
            Some(BunyanFormattingLayer::new(
                "edgex-admin".into(),
                std::io::stdout,
            )),
            None,
        )
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(JsonStorageLayer)
        .with(json)
        .with(pretty)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    init_tracing(settings.production);

    let app = app(&settings)?;

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    info!("Server starting at http://{}", settings.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
