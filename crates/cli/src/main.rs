use anyhow::Context;
use clap::{Parser, Subcommand};
use domainshop_app::{modules::diagnostics::probes, modules::domain::normalize, AppContext};
use domainshop_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "domainshop", version, about = "Domain sales site backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Look up a single domain with the configured registrar
    Check {
        domain: String,
        /// Print the registrar's raw response instead of a verdict
        #[arg(long)]
        raw: bool,
    },
    /// Probe every integration and print the results as JSON
    Probe,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load domainshop settings")?;
    domainshop_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => domainshop_app::serve(settings).await,
        Command::Check { domain, raw } => check(settings, &domain, raw).await,
        Command::Probe => {
            let ctx = AppContext::new(settings)?;
            let results = probes::run_all(&ctx).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
            Ok(())
        }
    }
}

async fn check(settings: Settings, input: &str, raw: bool) -> anyhow::Result<()> {
    let domain = normalize::normalize(input);
    if !normalize::is_plausible(&domain) {
        anyhow::bail!("'{}' is not a valid domain", input);
    }

    let ctx = AppContext::new(settings)?;
    if raw {
        let response = ctx
            .registrar
            .raw_lookup(&domain)
            .await
            .with_context(|| format!("registrar lookup for {} failed", domain))?;
        println!("HTTP {}\n{}", response.status_code, response.body);
        return Ok(());
    }

    let available = ctx
        .registrar
        .lookup(&domain)
        .await
        .with_context(|| format!("registrar lookup for {} failed", domain))?;
    println!(
        "{} is {}",
        domain,
        if available { "available" } else { "not available" }
    );
    Ok(())
}
