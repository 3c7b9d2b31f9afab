// ==========================================
// 商品目录导入 - 表头解析
// ==========================================
// 规则: TRIM + 忽略大小写精确匹配；同名列取第一列；11 个字段全部必需
// ==========================================

use crate::domain::row::RawRow;
use crate::domain::types::{FieldKind, ProductField, SourceFormat};
use crate::importer::error::{ImportError, ImportResult};
use tracing::debug;

/// 已解析的列：字段 → 列号 + 转换类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub field: ProductField,
    pub index: usize,
    pub kind: FieldKind,
}

/// 表头映射（按 ProductField::ALL 顺序，每个字段恰好一列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    format: SourceFormat,
    columns: Vec<ResolvedColumn>,
}

impl HeaderMap {
    pub fn source_format(&self) -> SourceFormat {
        self.format
    }

    pub fn column(&self, field: ProductField) -> ResolvedColumn {
        self.columns[field.ordinal()]
    }

    pub fn index_of(&self, field: ProductField) -> usize {
        self.column(field).index
    }

    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }
}

pub struct HeaderResolver;

impl HeaderResolver {
    /// 解析表头行
    ///
    /// # 返回
    /// - Ok(HeaderMap): 所有字段均找到
    /// - Err(MissingFields): 列出缺失字段
    pub fn resolve(header: &RawRow, format: SourceFormat) -> ImportResult<HeaderMap> {
        let mut found: [Option<usize>; ProductField::ALL.len()] = [None; ProductField::ALL.len()];

        for (index, cell) in header.cells.iter().enumerate() {
            if let Some(field) = ProductField::from_header(&cell.as_text()) {
                let slot = &mut found[field.ordinal()];
                if slot.is_none() {
                    *slot = Some(index);
                }
            }
        }

        let missing: Vec<ProductField> = ProductField::ALL
            .into_iter()
            .filter(|f| found[f.ordinal()].is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::MissingFields { format, missing });
        }

        let columns = ProductField::ALL
            .into_iter()
            .zip(found)
            .filter_map(|(field, index)| {
                index.map(|index| ResolvedColumn {
                    field,
                    index,
                    kind: field.kind(),
                })
            })
            .collect();

        debug!(format = %format, "表头解析完成");
        Ok(HeaderMap { format, columns })
    }
}
