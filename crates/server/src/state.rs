//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;
use crate::services::email::EmailService;
use crate::services::gateway::RazorpayClient;
use crate::services::notify::OpsNotifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool,
/// configuration, and external-service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: PgPool,
    gateway: RazorpayClient,
    email: Option<EmailService>,
    notifier: Option<OpsNotifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Email and operator notifications are optional; they are enabled only
    /// when their configuration is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay configuration is invalid.
    pub fn new(
        config: ServerConfig,
        pool: PgPool,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let gateway = RazorpayClient::new(&config.razorpay);
        let email = config
            .email
            .as_ref()
            .map(EmailService::new)
            .transpose()?;
        let notifier = config.ops_webhook_url.clone().map(OpsNotifier::new);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                gateway,
                email,
                notifier,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn gateway(&self) -> &RazorpayClient {
        &self.inner.gateway
    }

    /// Get the email service, if configured.
    #[must_use]
    pub fn email(&self) -> Option<&EmailService> {
        self.inner.email.as_ref()
    }

    /// Get the operator notifier, if configured.
    #[must_use]
    pub fn notifier(&self) -> Option<&OpsNotifier> {
        self.inner.notifier.as_ref()
    }
}
