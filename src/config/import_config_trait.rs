// ==========================================
// 商品目录导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::SourceFormat;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误（跨 await 需要 Send + Sync）
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取 CSV 分隔符
    ///
    /// # 默认值
    /// - `,`
    async fn get_csv_delimiter(&self) -> Result<u8, ConfigError>;

    /// 获取文本日期格式（按顺序尝试，chrono 格式串）
    ///
    /// # 默认值
    /// - CSV: `["%d-%m-%Y"]`
    /// - EXCEL: `["%d-%m-%Y", "%Y-%m-%d"]`
    async fn get_date_formats(&self, format: SourceFormat) -> Result<Vec<String>, ConfigError>;
}
