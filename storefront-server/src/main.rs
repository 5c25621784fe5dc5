use storefront_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env
    dotenv::dotenv().ok();

    // 2. 加载配置
    let config = Config::from_env();

    // 3. 日志 (guard 必须存活到进程结束)
    let _log_guard = init_logger_with_file(config.log_level.as_deref(), config.log_dir.as_deref());

    print_banner();
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path,
        "🍕 Slice storefront server starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
