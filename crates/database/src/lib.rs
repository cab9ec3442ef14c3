////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的存储底层操作
//
//////////////////////////////////////////////////////////////////////

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::{atomic::AtomicU64, Arc};
use tracing::info;

pub mod package;
pub mod receipt;
pub mod referral;

use package::model::Package;
use receipt::model::Receipt;
use referral::repository::ReferralState;

/// 进程内状态的统一入口
///
/// 存储全部在内存中（按规格不做持久化），但仓库层的trait接口
/// 与持久化后端兼容，换存储不需要动上层的Service与Handler。
#[derive(Clone)]
pub struct Database {
    /// 回执账本: charge id -> Receipt
    pub(crate) receipts: Arc<DashMap<String, Receipt>>,
    /// 回执插入序号，定义"最近一次购买"的全序
    pub(crate) receipt_seq: Arc<AtomicU64>,
    /// 推荐关系图（边 + 推荐人奖励条目），读写全部走一把锁
    pub(crate) referral: Arc<RwLock<ReferralState>>,
    /// 启动时装载的静态套餐目录
    pub(crate) packages: Arc<Vec<Package>>,
}

impl Database {
    pub fn new() -> Self {
        let packages = Package::catalog();
        info!("🧱 in-memory store ready ({} packages loaded)", packages.len());

        Self {
            receipts: Arc::new(DashMap::new()),
            receipt_seq: Arc::new(AtomicU64::new(1)),
            referral: Arc::new(RwLock::new(ReferralState::default())),
            packages: Arc::new(packages),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

pub use package::{model as package_model, repository as package_repository};
pub use receipt::{model as receipt_model, repository as receipt_repository};
pub use referral::{model as referral_model, repository as referral_repository};
