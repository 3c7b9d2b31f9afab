// ==========================================
// 商品目录导入 - 单元格数值 / 日期解析
// ==========================================
// 约定: 解析失败返回 None，由调用方决定默认值
// ==========================================

use crate::domain::row::CellValue;
use crate::domain::types::SourceFormat;
use crate::importer::file_parser::excel_serial_to_date;
use chrono::NaiveDate;

// ==========================================
// FieldParser Trait
// ==========================================
// 用途: 数值 / 日期解析的替换点（如本地化小数格式）
// 实现者: StandardFieldParser
pub trait FieldParser: Send + Sync {
    /// 解析小数；原生数值单元格直接使用
    fn parse_decimal(&self, cell: &CellValue) -> Option<f64>;

    /// 解析整数；原生数值单元格向零截断
    ///
    /// 文本规则随来源而定: CSV 只接受整数写法，Excel 按小数解析后截断
    fn parse_integer(&self, cell: &CellValue, format: SourceFormat) -> Option<i64>;

    /// 解析日期；文本按 formats 顺序尝试，原生日期 / 序列号直接转换
    fn parse_date(&self, cell: &CellValue, formats: &[String]) -> Option<NaiveDate>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardFieldParser;

impl FieldParser for StandardFieldParser {
    fn parse_decimal(&self, cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    fn parse_integer(&self, cell: &CellValue, format: SourceFormat) -> Option<i64> {
        match (cell, format) {
            // as 转换在越界时饱和
            (CellValue::Number(n), _) if n.is_finite() => Some(n.trunc() as i64),
            // CSV 文本只接受 32 位整数写法（"5.0" 视为无效）
            (CellValue::Text(s), SourceFormat::Csv) => s.trim().parse::<i32>().ok().map(i64::from),
            (CellValue::Text(s), SourceFormat::Excel) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| n.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i64),
            _ => None,
        }
    }

    fn parse_date(&self, cell: &CellValue, formats: &[String]) -> Option<NaiveDate> {
        match cell {
            CellValue::Date { date, .. } => Some(*date),
            CellValue::Number(n) => excel_serial_to_date(*n),
            CellValue::Text(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return None;
                }
                formats
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            }
            _ => None,
        }
    }
}
