use crate::{package::model::Package, Database};
use async_trait::async_trait;
use std::sync::Arc;
use utils::AppResult;

pub type DynPackageRepository = Arc<dyn PackageRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait PackageRepositoryTrait {
    // 按ID查套餐
    async fn find_package(&self, id: &str) -> AppResult<Option<Package>>;

    // 完整目录（客户端商店页用）
    async fn list_packages(&self) -> AppResult<Vec<Package>>;
}

#[async_trait]
impl PackageRepositoryTrait for Database {
    async fn find_package(&self, id: &str) -> AppResult<Option<Package>> {
        let package = self.packages.iter().find(|p| p.id == id).cloned();

        Ok(package)
    }

    async fn list_packages(&self) -> AppResult<Vec<Package>> {
        Ok(self.packages.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_lookup() {
        let db = Database::new();

        let pack = db.find_package("pack500").await.unwrap().unwrap();
        assert_eq!(pack.credits, 500);
        assert_eq!(pack.stars, 50);

        assert!(db.find_package("packXXXX").await.unwrap().is_none());
        assert_eq!(db.list_packages().await.unwrap().len(), 3);
    }
}
