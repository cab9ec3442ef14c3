use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 创建发票的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceDto {
    /// 买家用户ID
    pub user_id: i64,
    /// 套餐ID
    #[validate(length(min = 1))]
    pub package_id: String,
}

/// 创建发票的响应体
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLinkResponse {
    /// 平台返回的可支付链接
    pub invoice_link: String,
}

/// 发票负载
///
/// 创建发票时附在发票上，支付完成事件原样带回，用于把charge id
/// 关联回用户和套餐。
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayload {
    pub user_id: i64,
    pub package_id: String,
    pub created_at: u64,
}
