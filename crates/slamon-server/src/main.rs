use anyhow::Result;
use slamon_server::builders;
use slamon_server::config::ServerConfig;
use slamon_server::scheduler::AssessmentScheduler;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("slamon=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("config/server.toml");
    let config = ServerConfig::load(config_path)?;

    tracing::info!(
        config = config_path,
        repository = %config.repository.kind,
        adapter = %config.adapter.kind,
        notifier = %config.notifier.kind,
        check_period = ?config.assessment.check_period.as_std(),
        transient_time = ?config.assessment.transient_time.as_std(),
        "slamon-server starting"
    );

    let repo = builders::build_repository(&config.repository)?;
    if let Some(path) = &config.repository.agreements_file {
        let loaded = builders::seed_agreements(repo.as_ref(), path).await?;
        tracing::info!(loaded, "Agreements seeded");
    }
    let adapter = builders::build_adapter(&config.adapter)?;
    let notifier = builders::build_notifier(&config.notifier)?;

    let scheduler = AssessmentScheduler::new(
        repo,
        adapter,
        notifier,
        config.assessment.check_period.as_std(),
        config.assessment.transient_time.as_chrono(),
    );
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run().await;
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down gracefully");
    scheduler_handle.abort();
    tracing::info!("Server stopped");

    Ok(())
}
