use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 健康检查响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// 运行状态
    pub status: String,
    /// Bot标识
    pub bot: String,
    /// 在售套餐ID列表
    pub packages: Vec<String>,
}
