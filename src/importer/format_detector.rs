// ==========================================
// 商品目录导入 - 文件格式识别
// ==========================================
// 规则: 仅按文件名后缀识别（区分大小写），不读取内容
// ==========================================

use crate::domain::types::SourceFormat;
use crate::importer::error::{ImportError, ImportResult};

/// 由文件名识别格式
///
/// # 返回
/// - `.csv`  → SourceFormat::Csv
/// - `.xlsx` → SourceFormat::Excel
/// - 无文件名 → FileNameMissing
/// - 其他     → UnsupportedFormat
pub fn detect_format(file_name: Option<&str>) -> ImportResult<SourceFormat> {
    let name = file_name.ok_or(ImportError::FileNameMissing)?;

    if name.ends_with(".csv") {
        Ok(SourceFormat::Csv)
    } else if name.ends_with(".xlsx") {
        Ok(SourceFormat::Excel)
    } else {
        Err(ImportError::UnsupportedFormat(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_supported_suffixes() {
        assert_eq!(detect_format(Some("games.csv")).unwrap(), SourceFormat::Csv);
        assert_eq!(
            detect_format(Some("catalog.v2.xlsx")).unwrap(),
            SourceFormat::Excel
        );
    }

    #[test]
    fn test_detect_is_case_sensitive() {
        assert!(matches!(
            detect_format(Some("GAMES.CSV")),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Some("catalog.XLSX")),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_detect_rejects_other_inputs() {
        assert!(matches!(detect_format(None), Err(ImportError::FileNameMissing)));
        assert!(matches!(
            detect_format(Some("catalog.xls")),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Some("csv")),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }
}
