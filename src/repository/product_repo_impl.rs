// ==========================================
// 商品目录导入 - 商品仓储实现
// ==========================================
// 职责: 实现 ProductStore（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::product::{name_key, Product};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "id, name, description, price, stock, image, platforms, genres, \
                              discount, developer, publisher, release_date";

// ==========================================
// ProductRepositoryImpl
// ==========================================
pub struct ProductRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepositoryImpl {
    /// 创建新的 Repository 实例（建表幂等）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 共享连接（供 ConfigManager 等复用）
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中批量插入，返回已分配 id 的商品
    fn insert_all_tx(tx: &Transaction, products: Vec<Product>) -> RepositoryResult<Vec<Product>> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO products (
                id, name, name_key, description, price, stock, image,
                platforms, genres, discount, developer, publisher, release_date
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            )
            "#,
        )?;

        let mut saved = Vec::with_capacity(products.len());
        for mut product in products {
            let id = Uuid::new_v4().to_string();
            stmt.execute(params![
                id,
                product.name,
                product.name_key(),
                product.description,
                product.price,
                product.stock,
                product.image,
                product.platforms,
                product.genres,
                product.discount,
                product.developer,
                product.publisher,
                product.release_date,
            ])?;
            product.id = Some(id);
            saved.push(product);
        }

        Ok(saved)
    }

    fn map_row(row: &Row) -> rusqlite::Result<Product> {
        Ok(Product {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            stock: row.get(4)?,
            image: row.get(5)?,
            platforms: row.get(6)?,
            genres: row.get(7)?,
            discount: row.get(8)?,
            developer: row.get(9)?,
            publisher: row.get(10)?,
            release_date: row.get(11)?,
        })
    }

    fn exists_key(conn: &Connection, key: &str) -> RepositoryResult<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM products WHERE name_key = ?1 LIMIT 1",
                params![key],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(found)
    }
}

#[async_trait]
impl ProductStore for ProductRepositoryImpl {
    async fn exists_by_name(&self, name: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        Self::exists_key(&conn, &name_key(name))
    }

    /// 单次加锁完成整批名称检查
    async fn find_existing_names(&self, names: &[String]) -> RepositoryResult<HashSet<String>> {
        let conn = self.get_conn()?;
        let keys: HashSet<String> = names.iter().map(|n| name_key(n)).collect();

        let mut existing = HashSet::new();
        for key in keys {
            if Self::exists_key(&conn, &key)? {
                existing.insert(key);
            }
        }

        debug!(checked = names.len(), existing = existing.len(), "名称存在性检查完成");
        Ok(existing)
    }

    #[instrument(skip(self, products), fields(count = products.len()))]
    async fn save_all(&self, products: Vec<Product>) -> RepositoryResult<Vec<Product>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        // 失败时 tx 被 drop，整批回滚
        let saved = Self::insert_all_tx(&tx, products)?;
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        debug!(saved = saved.len(), "商品批量写入完成");
        Ok(saved)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM products WHERE id = ?1", SELECT_COLUMNS);
        let product = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(product)
    }

    async fn count_products(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn memory_repo() -> ProductRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        ProductRepositoryImpl::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_save_all_assigns_ids_in_order() {
        let repo = memory_repo();
        let saved = repo
            .save_all(vec![Product::named("Game A"), Product::named("Game B")])
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].name, "Game A");
        assert_eq!(saved[1].name, "Game B");
        assert!(saved.iter().all(|p| p.id.is_some()));
        assert_eq!(repo.count_products().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_exists_by_name_ignores_case() {
        let repo = memory_repo();
        repo.save_all(vec![Product::named("Halo Infinite")]).await.unwrap();

        assert!(repo.exists_by_name("halo infinite").await.unwrap());
        assert!(repo.exists_by_name("HALO INFINITE").await.unwrap());
        assert!(!repo.exists_by_name("Halo").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips_fields() {
        let repo = memory_repo();
        let mut product = Product::named("Game A");
        product.price = 19.99;
        product.discount = 0.1;
        product.stock = 5;
        product.release_date = NaiveDate::from_ymd_opt(2020, 6, 1);
        let saved = repo.save_all(vec![product]).await.unwrap();
        let id = saved[0].id.clone().unwrap();

        let found = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found, saved[0]);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_all_rolls_back_on_duplicate_name() {
        let repo = memory_repo();
        repo.save_all(vec![Product::named("Game A")]).await.unwrap();

        let result = repo
            .save_all(vec![Product::named("Game B"), Product::named("GAME A")])
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::UniqueConstraintViolation(_))
        ));
        // Game B 随事务回滚
        assert_eq!(repo.count_products().await.unwrap(), 1);
    }
}
