// ==========================================
// 商品目录导入 - 领域类型定义
// ==========================================
// 职责: 源文件格式 / 逻辑字段 / 字段类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 源文件格式 (Source Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceFormat {
    Csv,   // 分隔文本 (.csv)
    Excel, // 电子表格 (.xlsx)
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "CSV"),
            SourceFormat::Excel => write!(f, "EXCEL"),
        }
    }
}

// ==========================================
// 字段类型 (Field Kind)
// ==========================================
// 在表头解析时一次性确定，逐单元格不再按列名分派
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,    // 字符串（TRIM，允许为空）
    Decimal, // 小数（失败 → 0）
    Integer, // 整数（失败 → 0）
    Date,    // 日期（失败 → NULL）
}

// ==========================================
// 商品逻辑字段 (Product Field)
// ==========================================
// 11 个字段全部必需，没有可选列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductField {
    Name,
    Description,
    Price,
    Stock,
    Image,
    Platforms,
    Genres,
    Discount,
    Developer,
    Publisher,
    ReleaseDate,
}

impl ProductField {
    /// 表头顺序（与标准模板列顺序一致）
    pub const ALL: [ProductField; 11] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Price,
        ProductField::Stock,
        ProductField::Image,
        ProductField::Platforms,
        ProductField::Genres,
        ProductField::Discount,
        ProductField::Developer,
        ProductField::Publisher,
        ProductField::ReleaseDate,
    ];

    /// 标准列名（小写）
    pub fn column_name(&self) -> &'static str {
        match self {
            ProductField::Name => "name",
            ProductField::Description => "description",
            ProductField::Price => "price",
            ProductField::Stock => "stock",
            ProductField::Image => "image",
            ProductField::Platforms => "platforms",
            ProductField::Genres => "genres",
            ProductField::Discount => "discount",
            ProductField::Developer => "developer",
            ProductField::Publisher => "publisher",
            ProductField::ReleaseDate => "release_date",
        }
    }

    /// 表头单元格 → 逻辑字段（TRIM + 忽略大小写，精确匹配）
    pub fn from_header(header: &str) -> Option<ProductField> {
        let normalized = header.trim().to_lowercase();
        ProductField::ALL
            .into_iter()
            .find(|field| field.column_name() == normalized)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ProductField::Price | ProductField::Discount => FieldKind::Decimal,
            ProductField::Stock => FieldKind::Integer,
            ProductField::ReleaseDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// 在 `ALL` 中的位置，用作定长数组下标
    pub(crate) fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header_trims_and_ignores_case() {
        assert_eq!(ProductField::from_header("  Name "), Some(ProductField::Name));
        assert_eq!(
            ProductField::from_header("RELEASE_DATE"),
            Some(ProductField::ReleaseDate)
        );
        assert_eq!(ProductField::from_header("release date"), None);
        assert_eq!(ProductField::from_header(""), None);
    }

    #[test]
    fn test_ordinal_matches_all_order() {
        for (idx, field) in ProductField::ALL.iter().enumerate() {
            assert_eq!(field.ordinal(), idx);
        }
    }

    #[test]
    fn test_field_kind() {
        assert_eq!(ProductField::Price.kind(), FieldKind::Decimal);
        assert_eq!(ProductField::Discount.kind(), FieldKind::Decimal);
        assert_eq!(ProductField::Stock.kind(), FieldKind::Integer);
        assert_eq!(ProductField::ReleaseDate.kind(), FieldKind::Date);
        assert_eq!(ProductField::Publisher.kind(), FieldKind::Text);
    }
}
