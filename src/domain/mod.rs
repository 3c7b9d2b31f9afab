// ==========================================
// 商品目录导入 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入报告
// 红线: 不含数据访问逻辑，不含文件解析逻辑
// ==========================================

pub mod import;
pub mod product;
pub mod row;
pub mod types;

// 重导出核心类型
pub use import::{
    messages, ImportOutcome, ImportReport, ImportStatus, RejectedRow, SkipReason,
    SkippedProduct, UploadedFile,
};
pub use product::{name_key, FieldValue, Product};
pub use row::{CellValue, RawRow};
pub use types::{FieldKind, ProductField, SourceFormat};
