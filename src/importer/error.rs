// ==========================================
// 商品目录导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 结构性错误（客户端可修正） / 处理异常（整批放弃）
// ==========================================

use crate::domain::import::{messages, ImportStatus};
use crate::domain::types::{ProductField, SourceFormat};
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 结构性错误 =====
    #[error("文件名缺失")]
    FileNameMissing,

    #[error("文件格式不支持: {0}（仅支持 .csv/.xlsx）")]
    UnsupportedFormat(String),

    #[error("{0} 文件为空")]
    EmptyInput(SourceFormat),

    #[error("Excel 文件无工作表")]
    EmptyWorkbook,

    #[error("Excel 首行不存在，无表头")]
    MissingHeaderRow,

    #[error("{format} 表头缺少字段: {}", join_fields(.missing))]
    MissingFields {
        format: SourceFormat,
        missing: Vec<ProductField>,
    },

    // ===== 文件解析错误 =====
    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 存储错误 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },
}

fn join_fields(fields: &[ProductField]) -> String {
    fields
        .iter()
        .map(|f| f.column_name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ImportError {
    /// 是否为结构性错误（未触达存储，调用方修正文件后可重试）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::FileNameMissing
                | ImportError::UnsupportedFormat(_)
                | ImportError::EmptyInput(_)
                | ImportError::EmptyWorkbook
                | ImportError::MissingHeaderRow
                | ImportError::MissingFields { .. }
        )
    }

    pub fn status(&self) -> ImportStatus {
        if self.is_structural() {
            ImportStatus::ClientError
        } else {
            ImportStatus::Failed
        }
    }

    /// 对外消息文本
    ///
    /// # 参数
    /// - format: 已识别的文件格式（格式识别前失败时为 None）
    pub fn user_message(&self, format: Option<SourceFormat>) -> String {
        match self {
            ImportError::FileNameMissing => messages::FILE_NAME_NULL.to_string(),
            ImportError::UnsupportedFormat(_) => messages::UNSUPPORTED_FORMAT.to_string(),
            ImportError::EmptyInput(SourceFormat::Csv)
            | ImportError::MissingFields {
                format: SourceFormat::Csv,
                ..
            } => messages::CSV_HEADER_REQUIRED.to_string(),
            ImportError::MissingFields {
                format: SourceFormat::Excel,
                ..
            } => messages::EXCEL_COLUMNS_REQUIRED.to_string(),
            ImportError::EmptyWorkbook => messages::EXCEL_EMPTY.to_string(),
            ImportError::EmptyInput(SourceFormat::Excel) | ImportError::MissingHeaderRow => {
                messages::EXCEL_NO_HEADER.to_string()
            }
            _ => {
                let prefix = match format {
                    Some(SourceFormat::Csv) => messages::CSV_ERROR_PREFIX,
                    Some(SourceFormat::Excel) => messages::EXCEL_ERROR_PREFIX,
                    None => messages::FILE_ERROR_PREFIX,
                };
                format!("{}{}", prefix, self.detail())
            }
        }
    }

    /// 底层错误原文（不带本模块的分类前缀）
    fn detail(&self) -> String {
        match self {
            ImportError::ExcelParseError(msg) | ImportError::CsvParseError(msg) => msg.clone(),
            ImportError::ConfigReadError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
