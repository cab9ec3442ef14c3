use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "susgenes Backend API",
        description = "基于 Rust 和 Axum 的迷你游戏支付与推荐记账系统 API 文档",
        version = "1.0.0",
        contact(
            name = "API Support",
            email = "support@susgenes.xyz"
        )
    ),
    paths(
        // System health check
        crate::api::health,
        // Payment endpoints
        crate::api::invoice_controller::create_invoice,
        crate::api::webhook_controller::webhook,
        crate::api::package_controller::list_packages,
        // Referral endpoints
        crate::api::referral_controller::referral_bonus,
        crate::api::referral_controller::claim_referral,
    ),
    components(
        schemas(
            // Database models
            database::package::model::Package,
            database::receipt::model::Receipt,
            database::referral::model::ReferralEdge,
            database::referral::model::BonusEntry,
            database::referral::model::BonusKind,
            database::referral::model::BonusSummary,
            // DTOs
            crate::dtos::invoice_dto::CreateInvoiceDto,
            crate::dtos::invoice_dto::InvoiceLinkResponse,
            crate::dtos::referral_dto::BonusResponse,
            crate::dtos::referral_dto::ClaimReferralDto,
            crate::dtos::referral_dto::ClaimedResponse,
            crate::dtos::static_dto::HealthResponse,
        )
    ),
    tags(
        (name = "系统状态", description = "健康检查"),
        (name = "支付", description = "发票、套餐与平台webhook"),
        (name = "推荐", description = "推荐奖励查询与领取")
    )
)]
pub struct ApiDoc;
