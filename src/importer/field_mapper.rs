// ==========================================
// 商品目录导入 - 字段映射
// ==========================================
// 职责: 按表头映射从原始行构造 Product
// 规则: 文本字段 TRIM；数值失败 → 0；日期失败 → 空
// ==========================================

use crate::domain::product::{FieldValue, Product};
use crate::domain::row::{CellValue, RawRow};
use crate::domain::types::{FieldKind, ProductField};
use crate::importer::field_parser::FieldParser;
use crate::importer::header_resolver::{HeaderMap, ResolvedColumn};
use std::sync::Arc;

pub struct FieldMapper {
    header: HeaderMap,
    parser: Arc<dyn FieldParser>,
    date_formats: Vec<String>,
}

impl FieldMapper {
    pub fn new(header: HeaderMap, parser: Arc<dyn FieldParser>, date_formats: Vec<String>) -> Self {
        Self {
            header,
            parser,
            date_formats,
        }
    }

    /// 读取商品名称（TRIM 后为空返回 None）
    pub fn product_name(&self, row: &RawRow) -> Option<String> {
        let name = row
            .cell(self.header.index_of(ProductField::Name))
            .as_text()
            .trim()
            .to_string();
        (!name.is_empty()).then_some(name)
    }

    /// 将原始行映射为 Product（名称已由调用方读取并校验）
    pub fn map_to_product(&self, row: &RawRow, name: String) -> Product {
        let mut product = Product::named(name);
        for column in self.header.columns() {
            if column.field == ProductField::Name {
                continue;
            }
            let value = self.coerce(column, row.cell(column.index));
            product.apply(column.field, value);
        }
        product
    }

    fn coerce(&self, column: &ResolvedColumn, cell: &CellValue) -> FieldValue {
        match column.kind {
            FieldKind::Text => FieldValue::Text(cell.as_text().trim().to_string()),
            FieldKind::Decimal => FieldValue::Decimal(self.parser.parse_decimal(cell).unwrap_or(0.0)),
            FieldKind::Integer => FieldValue::Integer(
                self.parser
                    .parse_integer(cell, self.header.source_format())
                    .unwrap_or(0),
            ),
            FieldKind::Date => FieldValue::Date(self.parser.parse_date(cell, &self.date_formats)),
        }
    }
}
