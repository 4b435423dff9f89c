//! `snspulse poll`: the long-running ingestion loop.

use snspulse_db::SqliteRecordStore;
use snspulse_sentiment::{LexiconScorer, Poller, PollerSettings, SentimentClassifier};
use snspulse_twitter::TwitterClient;
use tokio_util::sync::CancellationToken;

use crate::logging;

/// Load config, open the store, and poll until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error only for startup failures: missing or invalid
/// configuration, an unopenable database, failed migrations, or an invalid
/// search base URL. Once polling starts nothing is fatal.
pub(crate) async fn run_poll() -> anyhow::Result<()> {
    let config = snspulse_core::load_app_config()?;
    let _log_guard = logging::init_with_file(&config.log_level, &config.log_dir)?;
    tracing::debug!(?config, "configuration loaded");

    let pool_config = snspulse_db::PoolConfig::from_app_config(&config);
    let pool = snspulse_db::connect_pool(&config.database_url, pool_config).await?;
    snspulse_db::health_check(&pool).await?;
    let applied = snspulse_db::run_migrations(&pool).await?;
    tracing::info!(applied, database = %config.database_url, "database ready");

    let client = TwitterClient::from_app_config(&config)?;
    let store = SqliteRecordStore::new(pool);

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let mut poller = Poller::new(
        client,
        store,
        SentimentClassifier::new(LexiconScorer),
        config.keywords.clone(),
        PollerSettings::from_app_config(&config),
        shutdown,
    );
    let summary = poller.run().await;

    poller.store().close().await;
    tracing::info!(
        cycles = summary.cycles_completed,
        saved = summary.saved,
        duplicates = summary.duplicates,
        store_failures = summary.store_failures,
        "shutdown complete"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, finishing current step");
}
