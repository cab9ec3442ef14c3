use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 支付回执模型
///
/// 每笔已完成支付对应一条，charge id唯一；退款成功后删除。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Receipt {
    /// 平台分配的charge id（每笔完成的支付唯一）
    pub charge_id: String,
    /// 买家用户ID
    pub user_id: i64,
    /// 套餐ID（负载解析失败时为None）
    pub package_id: Option<String>,
    /// 入账的积分数
    pub credits: u64,
    /// 插入序号，定义同一用户多笔购买的先后
    pub seq: u64,
    /// 创建时间戳
    pub timestamp: u64, // 1734187238
}
