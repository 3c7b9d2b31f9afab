// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、导入器构造、测试文件生成
// ==========================================

#![allow(dead_code)]

use product_catalog_import::config::ConfigManager;
use product_catalog_import::db::{init_schema, open_sqlite_connection};
use product_catalog_import::importer::ProductImporterImpl;
use product_catalog_import::repository::ProductRepositoryImpl;
use product_catalog_import::UploadedFile;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use std::error::Error;
use tempfile::NamedTempFile;

/// 完整表头（11 个字段）
pub const HEADER: [&str; 11] = [
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

pub type TestImporter = ProductImporterImpl<ProductRepositoryImpl, ConfigManager>;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().ok_or("非 UTF-8 路径")?.to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建共用同一连接的导入器
pub fn create_test_importer(db_path: &str) -> TestImporter {
    let repo = ProductRepositoryImpl::new(db_path).expect("Failed to create ProductRepository");
    let config =
        ConfigManager::from_connection(repo.connection()).expect("Failed to create ConfigManager");
    ProductImporterImpl::new(repo, config)
}

/// 组装 CSV 文件：完整表头 + 数据行
pub fn csv_file(name: &str, rows: &[&str]) -> UploadedFile {
    let mut content = HEADER.join(",");
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    UploadedFile::new(name, content)
}

/// Excel 单元格（测试用）
#[derive(Debug, Clone)]
pub enum XCell {
    Text(&'static str),
    Number(f64),
    Formula(&'static str),
    Date(u16, u8, u8),
    Blank,
}

/// 生成单工作表 .xlsx（行按给定顺序写入，`None` 表示整行留空）
pub fn xlsx_bytes(rows: &[Option<Vec<XCell>>]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (row_idx, row) in rows.iter().enumerate() {
        let Some(cells) = row else { continue };
        let r = row_idx as u32;
        for (col_idx, cell) in cells.iter().enumerate() {
            let c = col_idx as u16;
            match cell {
                XCell::Text(s) => {
                    sheet.write_string(r, c, *s)?;
                }
                XCell::Number(n) => {
                    sheet.write_number(r, c, *n)?;
                }
                XCell::Formula(f) => {
                    sheet.write_formula(r, c, *f)?;
                }
                XCell::Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(*y, *m, *d)?;
                    sheet.write_datetime_with_format(r, c, &date, &date_format)?;
                }
                XCell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer()
}

/// 完整表头的 Excel 表头行
pub fn xlsx_header() -> Vec<XCell> {
    HEADER.into_iter().map(XCell::Text).collect()
}

/// 仅名称 + 价格的 Excel 数据行，其余列留空
pub fn xlsx_row(name: XCell, price: XCell) -> Vec<XCell> {
    let mut row = vec![name, XCell::Blank, price];
    row.resize(HEADER.len(), XCell::Blank);
    row
}
