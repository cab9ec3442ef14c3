use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 积分套餐模型（静态目录，启动时装载，不可变）
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Package {
    /// 套餐ID
    pub id: String, // pack500
    /// 到账的游戏积分
    pub credits: u64, // 500
    /// 售价（平台货币单位，Star）
    pub stars: u64, // 50
    /// 展示用标签
    pub label: String, // "500⭐"
}

impl Package {
    /// 在售套餐目录
    pub fn catalog() -> Vec<Package> {
        vec![
            Package {
                id: "pack500".to_string(),
                credits: 500,
                stars: 50,
                label: "500⭐".to_string(),
            },
            Package {
                id: "pack1500".to_string(),
                credits: 1500,
                stars: 100,
                label: "1500⭐".to_string(),
            },
            Package {
                id: "pack5000".to_string(),
                credits: 5000,
                stars: 250,
                label: "5000⭐".to_string(),
            },
        ]
    }
}
