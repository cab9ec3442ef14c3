////////////////////////////////////////////////////////////////////////
//
// Service层：对仓库层的薄封装 + webhook分发器
// 每个Domain一个文件夹，controller只依赖这里的Dyn* trait对象
//
//////////////////////////////////////////////////////////////////////

pub mod payment;
pub mod referral;
pub mod webhook;

use crate::services::{
    payment::{
        invoice_service::{DynInvoiceService, InvoiceService},
        ledger_service::{DynLedgerService, LedgerService},
    },
    referral::referral_service::{DynReferralService, ReferralService},
    webhook::webhook_service::WebhookService,
};
use database::Database;
use std::sync::Arc;
use telegram::DynBotApi;
use tracing::info;
use utils::AppConfig;

#[derive(Clone)]
pub struct Services {
    pub ledger: DynLedgerService,
    pub invoice: DynInvoiceService,
    pub referral: DynReferralService,
    pub webhook: Arc<WebhookService>,
    pub database: Arc<Database>,
    pub config: Arc<AppConfig>,
}

impl Services {
    pub fn new(db: Database, bot: DynBotApi, config: Arc<AppConfig>) -> Self {
        let database = Arc::new(db);

        let ledger = Arc::new(LedgerService::new(database.clone())) as DynLedgerService;
        let invoice = Arc::new(InvoiceService::new(database.clone(), bot.clone())) as DynInvoiceService;
        let referral = Arc::new(ReferralService::new(database.clone())) as DynReferralService;

        let webhook = Arc::new(WebhookService::new(
            ledger.clone(),
            referral.clone(),
            database.clone(),
            bot,
            config.game_url.clone(),
            config.support_contact.clone(),
        ));

        info!("🧠 services initialized");

        Self {
            ledger,
            invoice,
            referral,
            webhook,
            database,
            config,
        }
    }
}
