// ==========================================
// 商品导入API
// ==========================================
// 职责: 封装商品导入、查询、导入配置覆写
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::import::{ImportOutcome, ImportStatus, UploadedFile};
use crate::domain::product::Product;
use crate::importer::{ProductImporter, ProductImporterImpl};
use crate::repository::{ProductRepositoryImpl, ProductStore};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入状态
    pub status: ImportStatus,
    /// 对外消息文本
    pub message: String,
    /// 新导入的商品数量
    pub imported: usize,
    /// 因重复跳过的商品数量
    pub skipped: usize,
    /// 名称为空被跳过的行数
    pub rejected_rows: usize,
    /// 新商品ID
    pub product_ids: Vec<String>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

impl From<ImportOutcome> for ImportApiResponse {
    fn from(outcome: ImportOutcome) -> Self {
        let (imported, skipped, rejected_rows, product_ids, elapsed_ms) = match outcome.report {
            Some(report) => (
                report.imported,
                report.skipped.len(),
                report.rejected_rows.len(),
                report.product_ids,
                report.elapsed_ms,
            ),
            None => (0, 0, 0, Vec::new(), 0),
        };

        Self {
            status: outcome.status,
            message: outcome.message,
            imported,
            skipped,
            rejected_rows,
            product_ids,
            elapsed_ms,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: ProductImporterImpl<ProductRepositoryImpl, ConfigManager>,
    config: ConfigManager,
}

impl ImportApi {
    /// 打开数据库并创建ImportApi实例（建表幂等）
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        info!(db_path = %db_path, "数据库已打开");

        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建（仓储与配置共用同一连接）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ApiResult<Self> {
        let repo = ProductRepositoryImpl::from_connection(Arc::clone(&conn))?;
        let importer_config = ConfigManager::from_connection(Arc::clone(&conn))
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let config = ConfigManager::from_connection(conn)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        Ok(Self {
            importer: ProductImporterImpl::new(repo, importer_config),
            config,
        })
    }

    /// 导入上传文件
    pub async fn import_file(&self, file: UploadedFile) -> ImportApiResponse {
        self.importer.import_batch(file).await.into()
    }

    /// 导入本地文件
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果（含客户端错误 / 处理失败）
    /// - Err(ApiError): 文件无法读取
    pub async fn import_path<P: AsRef<Path>>(&self, path: P) -> ApiResult<ImportApiResponse> {
        let path = path.as_ref();
        let file = UploadedFile::from_path(path).map_err(|e| {
            ApiError::InvalidInput(format!("文件读取失败 ({}): {}", path.display(), e))
        })?;
        Ok(self.import_file(file).await)
    }

    /// 并发导入多个本地文件（任一文件无法读取则不开始导入）
    pub async fn import_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
    ) -> ApiResult<Vec<ImportApiResponse>> {
        let files = paths
            .iter()
            .map(|p| {
                let path = p.as_ref();
                UploadedFile::from_path(path).map_err(|e| {
                    ApiError::InvalidInput(format!("文件读取失败 ({}): {}", path.display(), e))
                })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let outcomes = self.importer.import_many(files).await;
        Ok(outcomes.into_iter().map(ImportApiResponse::from).collect())
    }

    /// 按ID查询商品
    pub async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.importer
            .store()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})不存在", id)))
    }

    /// 商品总数
    pub async fn count_products(&self) -> ApiResult<usize> {
        Ok(self.importer.store().count_products().await?)
    }

    /// 覆写导入配置（下一次导入生效）
    pub fn set_config(&self, key: &str, value: &str) -> ApiResult<()> {
        if key.trim().is_empty() {
            return Err(ApiError::InvalidInput("配置键不能为空".to_string()));
        }
        self.config
            .set_config_value(key, value)
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }
}
