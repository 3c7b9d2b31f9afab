// ==========================================
// 商品目录导入 - 导入批次领域模型
// ==========================================
// 用途: 上传文件 / 导入报告 / 导入结果
// ==========================================

use crate::domain::types::SourceFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ==========================================
// 对外消息文本
// ==========================================
// 调用方按前缀区分客户端错误 / 成功，文本不可随意修改
pub mod messages {
    pub const FILE_NAME_NULL: &str = "File name is null";
    pub const UNSUPPORTED_FORMAT: &str =
        "The file format is not supported. Please upload a CSV or Excel file.";
    pub const CSV_HEADER_REQUIRED: &str = "CSV file mustn't contain header required";
    pub const EXCEL_COLUMNS_REQUIRED: &str =
        "The file mustn't contain columns required: name, description, price, stock";
    pub const EXCEL_EMPTY: &str = "The file Excel is empty ";
    pub const EXCEL_NO_HEADER: &str = "The Excel file doesn't have a header.";
    pub const CSV_ERROR_PREFIX: &str = "Error importing products from CSV: ";
    pub const EXCEL_ERROR_PREFIX: &str = "Error processing the Excel file: ";
    pub const FILE_ERROR_PREFIX: &str = "An error occurred while processing the file: ";
    pub const IMPORTED_PREFIX: &str = "Products imported: ";
}

// ==========================================
// UploadedFile - 上传文件
// ==========================================
// 文件名仅用于按后缀识别格式
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            content: content.into(),
        }
    }

    /// 从本地路径读取整个文件
    pub fn from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());
        Ok(Self { file_name, content })
    }
}

// ==========================================
// SkipReason - 跳过原因
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    AlreadyExists,   // 商品库中已存在
    DuplicateInFile, // 同一文件中较早的行已接受
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyExists => write!(f, "already exists"),
            SkipReason::DuplicateInFile => write!(f, "duplicate in file"),
        }
    }
}

// ==========================================
// SkippedProduct - 被跳过的重复商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedProduct {
    pub row_number: usize,
    pub name: String,
    pub reason: SkipReason,
}

impl SkippedProduct {
    /// 报告中的显示文本：文件内重复带后缀，库中已存在只显示名称
    pub fn label(&self) -> String {
        match self.reason {
            SkipReason::AlreadyExists => self.name.clone(),
            SkipReason::DuplicateInFile => format!("{} (duplicate in file)", self.name),
        }
    }
}

// ==========================================
// RejectedRow - 行级错误（跳过该行，不中断导入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row_number: usize,
    pub reason: String,
}

// ==========================================
// ImportReport - 导入报告
// ==========================================
// 生命周期: 导入流程内一次性构造，返回后不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub source_format: SourceFormat,
    pub total_rows: usize,              // 数据行数（不含表头）
    pub imported: usize,                // 成功落库数
    pub product_ids: Vec<String>,       // 新商品 ID（按落库顺序）
    pub skipped: Vec<SkippedProduct>,   // 重复跳过（按出现顺序）
    pub rejected_rows: Vec<RejectedRow>,
    pub elapsed_ms: u64,
}

impl ImportReport {
    /// `Products imported: N[. Duplicates skipped (M): a, b (duplicate in file)]`
    pub fn summary_message(&self) -> String {
        let mut message = format!("{}{}", messages::IMPORTED_PREFIX, self.imported);
        if !self.skipped.is_empty() {
            let labels: Vec<String> = self.skipped.iter().map(SkippedProduct::label).collect();
            message.push_str(&format!(
                ". Duplicates skipped ({}): {}",
                self.skipped.len(),
                labels.join(", ")
            ));
        }
        message
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_message())
    }
}

// ==========================================
// ImportStatus - 导入状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    Success,     // 导入完成（可能部分跳过）
    ClientError, // 结构性错误，需用户修正文件
    Failed,      // 处理过程中异常，未落库
}

impl ImportStatus {
    /// 由消息前缀反推状态（供只保留消息文本的调用方使用）
    pub fn from_message(message: &str) -> ImportStatus {
        const CLIENT_ERRORS: [&str; 6] = [
            messages::FILE_NAME_NULL,
            messages::UNSUPPORTED_FORMAT,
            messages::CSV_HEADER_REQUIRED,
            messages::EXCEL_COLUMNS_REQUIRED,
            messages::EXCEL_EMPTY,
            messages::EXCEL_NO_HEADER,
        ];
        const FAILURES: [&str; 3] = [
            messages::CSV_ERROR_PREFIX,
            messages::EXCEL_ERROR_PREFIX,
            messages::FILE_ERROR_PREFIX,
        ];

        if CLIENT_ERRORS.iter().any(|p| message.starts_with(p)) {
            ImportStatus::ClientError
        } else if FAILURES.iter().any(|p| message.starts_with(p)) {
            ImportStatus::Failed
        } else {
            ImportStatus::Success
        }
    }
}

// ==========================================
// ImportOutcome - 导入结果（对外唯一返回值）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub status: ImportStatus,
    pub message: String,
    pub report: Option<ImportReport>,
}

impl ImportOutcome {
    pub fn completed(report: ImportReport) -> Self {
        Self {
            status: ImportStatus::Success,
            message: report.summary_message(),
            report: Some(report),
        }
    }

    pub fn rejected(status: ImportStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            report: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ImportStatus::Success
    }

    pub fn imported(&self) -> usize {
        self.report.as_ref().map(|r| r.imported).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(imported: usize, skipped: Vec<SkippedProduct>) -> ImportReport {
        ImportReport {
            source_format: SourceFormat::Csv,
            total_rows: imported + skipped.len(),
            imported,
            product_ids: Vec::new(),
            skipped,
            rejected_rows: Vec::new(),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_summary_without_duplicates() {
        let report = report_with(3, Vec::new());
        assert_eq!(report.summary_message(), "Products imported: 3");
    }

    #[test]
    fn test_summary_with_mixed_duplicates() {
        let report = report_with(
            1,
            vec![
                SkippedProduct {
                    row_number: 2,
                    name: "Halo".to_string(),
                    reason: SkipReason::AlreadyExists,
                },
                SkippedProduct {
                    row_number: 4,
                    name: "Game A".to_string(),
                    reason: SkipReason::DuplicateInFile,
                },
            ],
        );
        assert_eq!(
            report.summary_message(),
            "Products imported: 1. Duplicates skipped (2): Halo, Game A (duplicate in file)"
        );
        assert_eq!(report.to_string(), report.summary_message());
    }

    #[test]
    fn test_status_from_message() {
        assert_eq!(
            ImportStatus::from_message("CSV file mustn't contain header required"),
            ImportStatus::ClientError
        );
        assert_eq!(
            ImportStatus::from_message(messages::EXCEL_NO_HEADER),
            ImportStatus::ClientError
        );
        assert_eq!(
            ImportStatus::from_message("Error processing the Excel file: zip error"),
            ImportStatus::Failed
        );
        assert_eq!(
            ImportStatus::from_message("Products imported: 0"),
            ImportStatus::Success
        );
    }

    #[test]
    fn test_outcome_completed_carries_message() {
        let outcome = ImportOutcome::completed(report_with(2, Vec::new()));
        assert!(outcome.is_success());
        assert_eq!(outcome.imported(), 2);
        assert_eq!(outcome.message, "Products imported: 2");
    }
}
