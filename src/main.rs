use std::sync::Arc;

use tokio::net::TcpListener;

use stemforge::application::ports::{JobRepository, StagingStore};
use stemforge::application::services::{JobOrchestrator, JobService};
use stemforge::infrastructure::compute::ComputeProviderFactory;
use stemforge::infrastructure::observability::{TracingConfig, init_tracing};
use stemforge::infrastructure::persistence::InMemoryJobRepository;
use stemforge::infrastructure::storage::{InMemoryStagingStore, StagingStoreFactory};
use stemforge::presentation::config::ComputeProviderSetting;
use stemforge::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));
    settings.validate()?;

    let scaffold = ScaffoldConfig::default();

    let staging_store: Arc<dyn StagingStore> = if scaffold.enabled {
        tracing::warn!("Scaffold mode: in-memory staging store and scripted providers");
        Arc::new(InMemoryStagingStore::permissive())
    } else {
        StagingStoreFactory::create(&settings.storage)?
    };

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let mut job_service =
        JobService::new(job_repository).with_polling_policy(settings.polling.policy());

    for (name, pipeline) in &settings.pipelines {
        let mut pipeline = pipeline.clone();
        if scaffold.enabled {
            pipeline.provider = ComputeProviderSetting::Scripted;
        }

        let provider =
            ComputeProviderFactory::create(name, &pipeline, scaffold.polls_until_complete)?;
        job_service = job_service.with_pipeline(JobOrchestrator::new(
            name.clone(),
            Arc::clone(&staging_store),
            provider,
            settings.storage.signed_url_ttl(),
        ));
    }

    let state = AppState::new(Arc::new(job_service));
    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        environment = %environment,
        pipelines = settings.pipelines.len(),
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
