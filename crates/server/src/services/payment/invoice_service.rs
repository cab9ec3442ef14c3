use crate::dtos::invoice_dto::InvoicePayload;
use async_trait::async_trait;
use chrono::prelude::Utc;
use database::package::repository::DynPackageRepository;
use std::sync::Arc;
use telegram::{DynBotApi, LabeledPrice};
use utils::{AppError, AppResult};

pub type DynInvoiceService = Arc<dyn InvoiceServiceTrait + Send + Sync>;

#[async_trait]
pub trait InvoiceServiceTrait {
    /// 校验套餐并向平台请求可支付链接
    ///
    /// 套餐不存在时直接以校验错误返回，不触发任何平台调用。
    async fn create_invoice(&self, user_id: i64, package_id: String) -> AppResult<String>;
}

#[derive(Clone)]
pub struct InvoiceService {
    packages: DynPackageRepository,
    bot: DynBotApi,
}

impl InvoiceService {
    pub fn new(packages: DynPackageRepository, bot: DynBotApi) -> Self {
        Self { packages, bot }
    }
}

#[async_trait]
impl InvoiceServiceTrait for InvoiceService {
    async fn create_invoice(&self, user_id: i64, package_id: String) -> AppResult<String> {
        let package = self
            .packages
            .find_package(&package_id)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Invalid package: {}", package_id)))?;

        // 负载在支付完成事件里原样回来，是charge与用户/套餐关联的唯一纽带
        let payload = serde_json::to_string(&InvoicePayload {
            user_id,
            package_id: package.id.clone(),
            created_at: Utc::now().timestamp() as u64,
        })
        .map_err(anyhow::Error::from)?;

        let link = self
            .bot
            .create_invoice_link(
                &format!("{} Game Credits", package.label),
                &format!("Get {} credits for sus.genes", package.credits),
                &payload,
                "XTR",
                vec![LabeledPrice {
                    label: package.label.clone(),
                    amount: package.stars,
                }],
            )
            .await?;

        Ok(link)
    }
}
