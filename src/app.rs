//! Application wiring: provider clients, the request gate and the HTTP server.

use crate::ai::{ChatService, ImageGenerationService, OpenAiChatClient, OpenAiImageClient};
use crate::api;
use crate::gate::RequestGate;
use crate::models::Config;
use crate::Result;
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

/// Owns the configuration and the gate that every request goes through.
pub struct App {
    config: Config,
    gate: Arc<RequestGate>,
}

/// Injectable provider bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub chat: Arc<dyn ChatService>,
    pub image: Arc<dyn ImageGenerationService>,
}

impl App {
    /// Build an app from concrete provider clients.
    pub fn with_services(config: Config, services: AppServices) -> Self {
        let gate = RequestGate::new(
            config.openai_api_key.clone(),
            services.chat,
            services.image,
        );

        Self {
            config,
            gate: Arc::new(gate),
        }
    }

    /// Build an app talking to OpenAI with the configured models.
    pub fn from_config(config: Config) -> Self {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();
        let api_key = config.openai_api_key.clone().unwrap_or_default();

        info!("Chat provider: OpenAI (model: {})", config.chat_model);
        let chat = OpenAiChatClient::new_with_client(
            api_key.clone(),
            config.chat_model.clone(),
            http_client.clone(),
        )
        .with_base_url(config.openai_base_url.clone());

        info!("Image provider: OpenAI (model: {})", config.image_model);
        let image =
            OpenAiImageClient::new_with_client(api_key, config.image_model.clone(), http_client)
                .with_base_url(config.openai_base_url.clone());

        Self::with_services(
            config,
            AppServices {
                chat: Arc::new(chat),
                image: Arc::new(image),
            },
        )
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> Router {
        api::router(self.gate.clone())
    }

    /// Bind the configured address and serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Mindflow personality server running on {}", addr);
        if self.gate.is_configured() {
            info!("OpenAI API key configured");
        } else {
            warn!("OPENAI_API_KEY environment variable not set");
            warn!("Create a .env file containing OPENAI_API_KEY=your_api_key_here");
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
