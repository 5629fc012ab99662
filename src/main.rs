use anyhow::Context;
use domainshop_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load domainshop settings")?;
    domainshop_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        host = %settings.server.host,
        port = settings.server.port,
        "domainshop-app bootstrap starting"
    );

    domainshop_app::serve(settings).await
}
