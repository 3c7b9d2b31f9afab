// ==========================================
// 商品目录导入 - 商品仓储 Trait
// ==========================================
// 职责: 定义导入所需的商品数据访问接口（不包含实现）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::product::{name_key, Product};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// ProductStore Trait
// ==========================================
// 用途: 导入器依赖的商品存储抽象
// 实现者: ProductRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 检查商品名称是否已存在（忽略大小写）
    async fn exists_by_name(&self, name: &str) -> RepositoryResult<bool>;

    /// 批量检查名称是否已存在
    ///
    /// # 返回
    /// - 已存在名称的去重键集合（小写）
    ///
    /// # 说明
    /// - 默认实现逐个调用 `exists_by_name`
    /// - 结果是某一时刻的快照，不与后续写入构成事务
    async fn find_existing_names(&self, names: &[String]) -> RepositoryResult<HashSet<String>> {
        let mut existing = HashSet::new();
        for name in names {
            let key = name_key(name);
            if existing.contains(&key) {
                continue;
            }
            if self.exists_by_name(name).await? {
                existing.insert(key);
            }
        }
        Ok(existing)
    }

    /// 批量保存商品（单事务）
    ///
    /// # 返回
    /// - Ok(Vec<Product>): 已分配 id 的商品，顺序与输入一致
    /// - Err: 任一记录失败则整体回滚
    async fn save_all(&self, products: Vec<Product>) -> RepositoryResult<Vec<Product>>;

    /// 按 ID 查询商品
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Product>>;

    /// 统计商品数
    async fn count_products(&self) -> RepositoryResult<usize>;
}
