//! POS Server - 餐厅收银与外卖后台
//!
//! # 架构概述
//!
//! - **业务规则** (`billing`): ITBIS、信用额度、订单状态机、赊账结算、日结对账 (纯函数)
//! - **数据库** (`db`): SQLite (sqlx, WAL) 与各表的 repository
//! - **HTTP API** (`api`): axum 路由、处理器和中间件
//! - **消息总线** (`message`): 业务变更的广播通知 (WebSocket 推送)
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、错误、HTTP 服务器
//! ├── billing/       # 业务规则
//! ├── db/            # 连接池、迁移、repository
//! ├── api/           # HTTP 路由和处理器
//! ├── message/       # 通知广播
//! └── utils/         # 日志、时间、输入校验
//! ```

pub mod api;
pub mod billing;
pub mod core;
pub mod db;
pub mod message;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use message::MessageBus;
pub use utils::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 加载 `.env` 并初始化日志
pub fn setup_environment() -> Config {
    if let Err(e) = dotenv::dotenv() {
        // .env 可选
        eprintln!("No .env loaded: {e}");
    }
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____  ____  _____
   / __ \/ __ \/ ___/
  / /_/ / / / /\__ \
 / ____/ /_/ /___/ /
/_/    \____//____/
    "#
    );
}
