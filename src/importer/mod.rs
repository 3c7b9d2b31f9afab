// ==========================================
// 商品目录导入 - 导入层
// ==========================================
// 职责: 上传文件 → 商品记录 → 落库 → 导入报告
// 支持: CSV (.csv) / Excel (.xlsx)
// ==========================================

// 模块声明
pub mod batch_assembler;
pub mod conflict_handler;
pub mod error;
pub mod field_mapper;
pub mod field_parser;
pub mod file_parser;
pub mod format_detector;
pub mod header_resolver;
pub mod product_importer_impl;
pub mod product_importer_trait;

// 重导出核心类型
pub use batch_assembler::{AssembledBatch, BatchAssembler};
pub use conflict_handler::{Admission, DedupGate};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use field_parser::{FieldParser, StandardFieldParser};
pub use file_parser::{open_reader, CsvRowReader, ExcelRowReader, TabularReader};
pub use format_detector::detect_format;
pub use header_resolver::{HeaderMap, HeaderResolver, ResolvedColumn};
pub use product_importer_impl::ProductImporterImpl;

// 重导出 Trait 接口
pub use product_importer_trait::ProductImporter;
