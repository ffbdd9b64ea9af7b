use anyhow::Context;
use pos_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment();

    if config.is_development() {
        print_banner();
    }
    tracing::info!(
        port = config.http_port,
        database = %config.database_path,
        timezone = %config.timezone,
        environment = %config.environment,
        "POS server starting..."
    );

    // 2. 打开数据库并执行迁移
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
