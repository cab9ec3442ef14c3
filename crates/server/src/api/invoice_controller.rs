use crate::{
    dtos::invoice_dto::{CreateInvoiceDto, InvoiceLinkResponse},
    extractors::validation_extractor::ValidationExtractor,
    services::Services,
};
use axum::{routing::post, Extension, Json, Router};
use utils::AppResult;

/// 创建发票链接
///
/// 校验套餐后向支付平台请求一个可支付链接，Mini App内拉起支付
///
/// # 响应
///
/// 成功返回 `{"invoiceLink": "..."}`；套餐无效返回400，
/// 平台失败时携带平台的description返回500
#[utoipa::path(
    post,
    path = "/create-invoice",
    request_body = CreateInvoiceDto,
    responses(
        (status = 200, description = "发票链接创建成功", body = InvoiceLinkResponse),
        (status = 400, description = "套餐ID无效"),
        (status = 500, description = "支付平台调用失败")
    ),
    tag = "支付"
)]
pub async fn create_invoice(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<CreateInvoiceDto>,
) -> AppResult<Json<InvoiceLinkResponse>> {
    let invoice_link = services.invoice.create_invoice(req.user_id, req.package_id).await?;

    Ok(Json(InvoiceLinkResponse { invoice_link }))
}

pub struct InvoiceController;
impl InvoiceController {
    pub fn app() -> Router {
        Router::new().route("/create-invoice", post(create_invoice))
    }
}
