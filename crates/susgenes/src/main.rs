use anyhow::{Context, Result};
use clap::Parser;
use server::app::ApplicationServer;
use std::sync::Arc;
use tokio::{signal, task::JoinSet};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let susgenes = Susgenes::new();
    susgenes.run().await.expect("susgenes backend error");

    Ok(())
}

pub struct Susgenes {
    config: Arc<AppConfig>,
    // 进程退出前不能丢，否则缓冲中的日志写不完
    _log_guard: WorkerGuard,
}

impl Susgenes {
    pub fn new() -> Self {
        let config = Susgenes::with_config();
        let log_guard = Logger::new(config.cargo_env);

        Self {
            config,
            _log_guard: log_guard,
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut set = JoinSet::new();

        // 1. 启动api & services
        // （webhook、发票、推荐记账都挂在同一个HTTP进程上）
        let config = self.config.clone();
        set.spawn(async move {
            ApplicationServer::serve(config)
                .await
                .context("🔴 Failed to start server")
                .expect("🔴 Failed to start server");
        });

        tokio::select! {
            _ = async {
                while let Some(_) = set.join_next().await {
                    info!("🔔 Task completed");
                }
            } => {},
            _ = shutdown_signal() => {
                info!("🔔 Shutdown signal received, stopping all tasks...");
            },
        }

        Ok(())
    }
}

impl Susgenes {
    fn with_config() -> Arc<AppConfig> {
        // 根据 CARGO_ENV 加载对应的环境配置文件
        utils::EnvLoader::load_env_file().ok();
        let config = Arc::new(AppConfig::parse());
        config
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("🔴 Failed to install Ctrl+C handler");
        info!("🔔 Ctrl+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("🔴 Failed to install signal handler")
            .recv()
            .await;
        info!("🔔 Terminate signal received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("❌ Signal received, starting graceful shutdown...");
}
