use std::net::SocketAddr;
use std::sync::Arc;
use axum::Server;
use tracing::info;
use anyhow::{Result, anyhow};
use crate::config::Config;
use crate::http::HttpServer;
use crate::render::PngDataUrlRenderer;

pub struct PromptPayServer {
    http_server: HttpServer,
    http_addr: SocketAddr,
}

impl PromptPayServer {
    pub fn new(config: Config) -> Result<Self> {
        let http_addr: SocketAddr = format!("{}:{}", config.http_host, config.http_port)
            .parse()
            .map_err(|e| anyhow!("Invalid listen address {}:{}: {}", config.http_host, config.http_port, e))?;

        info!(
            "Scheme {} country={} currency={} policy={:?}",
            config.scheme.application_id,
            config.scheme.default_country,
            config.scheme.default_currency,
            config.scheme.currency_policy,
        );

        let renderer = Arc::new(PngDataUrlRenderer::new(config.render));
        let http_server = HttpServer::new(config.scheme, renderer);

        Ok(Self {
            http_server,
            http_addr,
        })
    }

    pub async fn run(self) -> Result<()> {
        let http_app = self.http_server.router();

        info!("Starting HTTP server on http://{}", self.http_addr);

        Server::bind(&self.http_addr)
            .serve(http_app.into_make_service())
            .await?;

        Ok(())
    }
}
