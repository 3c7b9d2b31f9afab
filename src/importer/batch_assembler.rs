// ==========================================
// 商品目录导入 - 批次组装
// ==========================================
// 职责: 对数据行做一次折叠，得到待落库商品 / 跳过列表 / 行级错误
// 红线: 不访问存储（存在性快照由调用方提供）
// ==========================================

use crate::domain::import::{RejectedRow, SkipReason, SkippedProduct};
use crate::domain::product::Product;
use crate::domain::row::RawRow;
use crate::importer::conflict_handler::{Admission, DedupGate};
use crate::importer::field_mapper::FieldMapper;
use tracing::debug;

/// 组装结果（生成后不再修改）
#[derive(Debug, Default)]
pub struct AssembledBatch {
    pub total_rows: usize,
    pub products: Vec<Product>,
    pub skipped: Vec<SkippedProduct>,
    pub rejected: Vec<RejectedRow>,
}

impl AssembledBatch {
    fn with_row(mut self, mapper: &FieldMapper, gate: &mut DedupGate, row: RawRow) -> Self {
        self.total_rows += 1;

        let name = match mapper.product_name(&row) {
            Some(name) => name,
            None => {
                debug!(row = row.row_number, "商品名称为空，跳过");
                self.rejected.push(RejectedRow {
                    row_number: row.row_number,
                    reason: "name is blank".to_string(),
                });
                return self;
            }
        };

        match gate.admit(&name) {
            Admission::Accepted => {
                let product = mapper.map_to_product(&row, name);
                self.products.push(product);
            }
            Admission::RejectedExists => self.skipped.push(SkippedProduct {
                row_number: row.row_number,
                name,
                reason: SkipReason::AlreadyExists,
            }),
            Admission::RejectedInFile => self.skipped.push(SkippedProduct {
                row_number: row.row_number,
                name,
                reason: SkipReason::DuplicateInFile,
            }),
        }
        self
    }
}

pub struct BatchAssembler<'a> {
    mapper: &'a FieldMapper,
}

impl<'a> BatchAssembler<'a> {
    pub fn new(mapper: &'a FieldMapper) -> Self {
        Self { mapper }
    }

    /// 按源文件顺序折叠数据行
    pub fn assemble<I>(&self, rows: I, mut gate: DedupGate) -> AssembledBatch
    where
        I: IntoIterator<Item = RawRow>,
    {
        let batch = rows.into_iter().fold(AssembledBatch::default(), |batch, row| {
            batch.with_row(self.mapper, &mut gate, row)
        });
        debug!(
            total_rows = batch.total_rows,
            accepted_names = gate.accepted_count(),
            "数据行折叠完成"
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::row::CellValue;
    use crate::domain::types::SourceFormat;
    use crate::importer::field_parser::StandardFieldParser;
    use crate::importer::header_resolver::HeaderResolver;
    use std::collections::HashSet;
    use std::sync::Arc;

    const HEADER: [&str; 11] = [
        "name",
        "description",
        "price",
        "stock",
        "image",
        "platforms",
        "genres",
        "discount",
        "developer",
        "publisher",
        "release_date",
    ];

    fn row(row_number: usize, name: &str, price: &str) -> RawRow {
        RawRow::new(
            row_number,
            vec![
                CellValue::Text(name.to_string()),
                CellValue::Text(String::new()),
                CellValue::Text(price.to_string()),
            ],
        )
    }

    fn mapper() -> FieldMapper {
        let header = RawRow::new(
            1,
            HEADER.iter().map(|h| CellValue::Text(h.to_string())).collect(),
        );
        let map = HeaderResolver::resolve(&header, SourceFormat::Csv).unwrap();
        FieldMapper::new(map, Arc::new(StandardFieldParser), vec!["%d-%m-%Y".to_string()])
    }

    #[test]
    fn test_assemble_in_file_duplicate() {
        let mapper = mapper();
        let rows = vec![
            row(2, "Game A", "10"),
            row(3, "Game B", "20"),
            row(4, "game a", "30"),
        ];

        let batch = BatchAssembler::new(&mapper).assemble(rows, DedupGate::default());

        assert_eq!(batch.total_rows, 3);
        assert_eq!(batch.products.len(), 2);
        assert_eq!(batch.products[0].name, "Game A");
        assert_eq!(batch.products[0].price, 10.0);
        assert_eq!(batch.products[1].name, "Game B");
        assert_eq!(
            batch.skipped,
            vec![SkippedProduct {
                row_number: 4,
                name: "game a".to_string(),
                reason: SkipReason::DuplicateInFile,
            }]
        );
    }

    #[test]
    fn test_assemble_existing_and_blank_rows() {
        let mapper = mapper();
        let existing: HashSet<String> = ["halo".to_string()].into_iter().collect();
        let rows = vec![row(2, "  ", "1"), row(3, "Halo", "2"), row(4, "Doom", "3")];

        let batch = BatchAssembler::new(&mapper).assemble(rows, DedupGate::new(existing));

        assert_eq!(batch.total_rows, 3);
        assert_eq!(batch.products.len(), 1);
        assert_eq!(batch.products[0].name, "Doom");
        assert_eq!(batch.skipped[0].reason, SkipReason::AlreadyExists);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].row_number, 2);
    }

    #[test]
    fn test_assemble_empty_input() {
        let mapper = mapper();
        let batch = BatchAssembler::new(&mapper).assemble(Vec::new(), DedupGate::default());
        assert_eq!(batch.total_rows, 0);
        assert!(batch.products.is_empty());
    }
}
