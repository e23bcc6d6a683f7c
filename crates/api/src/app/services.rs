//! Service wiring: picks store backends from config and builds the auth services.

use std::sync::Arc;

use anyhow::Context;

use awap_auth::{Accounts, Authenticator, CredentialStore, SessionIssuer, SessionReader};
use awap_infra::audit::{AuditLog, InMemoryAuditLog, PostgresAuditLog};
use awap_infra::{InMemoryUserStore, PostgresUserStore, db, seed};

use crate::config::AppConfig;

pub struct AppServices {
    pub authenticator: Authenticator,
    pub accounts: Accounts,
    pub sessions: SessionReader,
    pub audit: Arc<dyn AuditLog>,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl AppServices {
    pub fn new(config: &AppConfig, store: Arc<dyn CredentialStore>, audit: Arc<dyn AuditLog>) -> anyhow::Result<Self> {
        let issuer = SessionIssuer::new(&config.session_secret, config.session_ttl);
        let authenticator = Authenticator::new(store.clone(), issuer, config.hash_cost, config.store_timeout)
            .context("failed to initialize authenticator")?;

        Ok(Self {
            authenticator,
            accounts: Accounts::new(store, config.hash_cost, config.store_timeout),
            sessions: SessionReader::new(&config.session_secret),
            audit,
            secure_cookies: config.secure_cookies,
        })
    }
}

/// Postgres when `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let (store, audit): (Arc<dyn CredentialStore>, Arc<dyn AuditLog>) = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url, config.store_timeout)
                .await
                .context("failed to connect to postgres")?;
            db::ensure_schema(&pool).await.context("failed to ensure schema")?;
            tracing::info!("using postgres stores");
            (
                Arc::new(PostgresUserStore::new(pool.clone())),
                Arc::new(PostgresAuditLog::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            (Arc::new(InMemoryUserStore::new()), Arc::new(InMemoryAuditLog::new()))
        }
    };

    if config.seed_dev_users {
        let created = seed::seed_dev_users(store.as_ref(), config.hash_cost)
            .await
            .context("failed to seed dev users")?;
        tracing::info!(created, "dev users seeded");
    }

    AppServices::new(config, store, audit)
}
