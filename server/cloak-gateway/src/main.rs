use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth_identity::{AuthService, PgUserRepository, RedisTokenIndex, TokenSigner};
use mapping_store::{MappingService, PgMappingRepository, RedisMappingCache};
use storage_common::{connect_postgres, connect_redis, run_migrations};
use tokenizer::{KeyService, TokenizerService};

use cloak_gateway::backend::{AuthBackend, MappingBackend, TokenizerBackend};
use cloak_gateway::{routes, tls, AppState, GatewaySettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = GatewaySettings::load().context("failed to read configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    let pool = connect_postgres(&settings.postgres)
        .await
        .context("failed to connect to postgres")?;
    run_migrations(&pool).await.context("migrations failed")?;

    let auth_redis = connect_redis(&settings.redis, settings.auth.redis_db)
        .await
        .context("failed to connect to auth redis")?;
    let mapping_redis = connect_redis(&settings.redis, settings.mapping.redis_db)
        .await
        .context("failed to connect to mapping redis")?;

    let signer = TokenSigner::new(
        &settings.auth.jwt_secret,
        settings.auth.access_ttl_secs,
        settings.auth.refresh_ttl_secs,
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(RedisTokenIndex::new(auth_redis)),
        signer.clone(),
    ));

    let kms: Arc<dyn KeyService> = Arc::new(
        tokenizer::kms::VaultTransitClient::new(settings.tokenizer.vault.clone())
            .context("failed to build vault client")?,
    );
    let tokenizer_service = Arc::new(TokenizerService::new(
        kms,
        settings.tokenizer.derivation_context.clone(),
    ));

    let mapping_service = Arc::new(MappingService::new(
        Arc::new(PgMappingRepository::new(pool.clone())),
        Arc::new(RedisMappingCache::new(mapping_redis)),
        settings.mapping.cache_ttl_secs,
    ));

    let policy = settings.backend.retry_policy();
    let state = AppState {
        auth: Arc::new(AuthBackend::new(
            auth_service,
            policy,
            settings.backend.auth_deadline(),
        )),
        tokenizer: Arc::new(TokenizerBackend::new(
            tokenizer_service,
            policy,
            settings.backend.tokenizer_deadline(),
        )),
        mapping: Arc::new(MappingBackend::new(
            mapping_service,
            policy,
            settings.backend.mapping_deadline(),
        )),
        signer,
        cookies: settings.cookies.clone(),
    };

    let app = routes::router(state);
    let addr: SocketAddr = format!("{}:{}", settings.http.host, settings.http.port)
        .parse()
        .context("invalid bind address")?;

    info!(%addr, tls = settings.tls.enabled, "gateway starting");

    if settings.tls.enabled {
        let rustls = tls::rustls_server_config(&settings.tls).await?;
        let handle = axum_server::Handle::new();
        {
            let handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
            });
        }
        axum_server::bind_rustls(addr, rustls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("tls server error")?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("failed to bind")?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;
    }

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
