// ==========================================
// 商品目录导入 - 核心库
// ==========================================
// 职责: CSV / Excel 商品目录批量导入（表头解析、单元格转换、去重、落库、报告）
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{FieldKind, ProductField, SourceFormat};

// 领域实体
pub use domain::{
    CellValue, ImportOutcome, ImportReport, ImportStatus, Product, RawRow, RejectedRow,
    SkipReason, SkippedProduct, UploadedFile,
};

// 导入接口
pub use importer::{ImportError, ImportResult, ProductImporter, ProductImporterImpl};

// 仓储接口
pub use repository::{ProductRepositoryImpl, ProductStore, RepositoryError, RepositoryResult};

// 配置
pub use config::{ConfigManager, ImportConfigReader, ImportSettings};

// API
pub use api::{ApiError, ApiResult, ImportApi, ImportApiResponse};

// ==========================================
// 版本信息
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Product Catalog Import";
