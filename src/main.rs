// Copyright Rivtower Technologies LLC.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[macro_use]
extern crate tracing;

use color_eyre::Result;
use consul_registrar::{
    configure::AppConfig,
    consul::ConsulClient,
    health,
    identity::ServiceIdentity,
    log::init_tracing,
    payload::SERVICE_PORT,
    registrar::{self, Registrar},
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = AppConfig::load()?;
    init_tracing(env!("CARGO_PKG_NAME"), &config.log)?;
    if !config.serves_advertised_port() {
        warn!(
            "listen_addr {} differs from advertised port {}, registry health checks will fail",
            config.listen_addr, SERVICE_PORT
        );
    }

    let identity = ServiceIdentity::generate();
    let client = ConsulClient::new(config.consul.register_timeout())
        .unwrap_or_else(|e| registrar::terminate(e));
    let registrar = Registrar::new(identity.clone(), client, &config.consul.hostname_path);
    registrar
        .register(&config.consul.consul_url, &config.consul.service_name)
        .await;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("health check listening on {}", config.listen_addr);
    axum::serve(listener, health::router(identity))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if config.consul.deregister_on_shutdown {
        registrar.deregister(&config.consul.consul_url).await;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("install ctrl-c handler failed: {e}");
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
                error!("install SIGTERM handler failed: {e}");
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
    info!("shutting down");
}
