use serde::Serialize;
use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::message::MessageBus;
use crate::utils::AppResult;
use shared::message::{Notification, NotificationType};

/// 服务器状态 - 持有所有服务的共享引用
///
/// Clone 成本很低 (连接池与广播通道内部都是 Arc)。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | bus | MessageBus | 通知广播 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub bus: MessageBus,
}

impl ServerState {
    /// 创建服务器状态 (手动构造, 测试用)
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let bus = MessageBus::with_capacity(config.bus_capacity);
        Self { config, pool, bus }
    }

    /// 打开数据库并执行迁移
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        if let Some(parent) = std::path::Path::new(&config.database_path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                shared::AppError::internal(format!(
                    "Failed to create data directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let db = DbService::new(&config.database_path).await?;
        Ok(Self::new(config.clone(), db.pool))
    }

    /// 广播变更通知到所有 WebSocket 客户端
    ///
    /// 发布失败不影响请求结果
    pub fn notify<T: Serialize>(&self, kind: NotificationType, data: &T) {
        self.bus.publish(Notification::new(kind, data));
    }

    /// 广播删除通知 `{ "id": id }`
    pub fn notify_deleted(&self, kind: NotificationType, id: i64) {
        self.bus.publish(Notification::deleted(kind, id));
    }
}
