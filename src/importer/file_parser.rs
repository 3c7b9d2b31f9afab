// ==========================================
// 商品目录导入 - 表格读取器
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx，仅第一个工作表)
// 约定: 第一次 next_row 返回表头行；读取器不做 TRIM
// ==========================================

use crate::config::ImportSettings;
use crate::domain::row::{CellValue, RawRow};
use crate::domain::types::SourceFormat;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::{Days, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use std::io::{Cursor, Read};
use tracing::debug;

// ==========================================
// TabularReader Trait
// ==========================================
pub trait TabularReader {
    fn source_format(&self) -> SourceFormat;

    /// 读取下一行
    ///
    /// # 返回
    /// - Ok(Some(row)): 下一行（首次调用为表头）
    /// - Ok(None): 已读完
    /// - Err: 文件为空或解析失败
    fn next_row(&mut self) -> ImportResult<Option<RawRow>>;
}

/// 将读取器包装为迭代器
pub fn rows<'a, R>(reader: &'a mut R) -> impl Iterator<Item = ImportResult<RawRow>> + 'a
where
    R: TabularReader + ?Sized,
{
    std::iter::from_fn(move || reader.next_row().transpose())
}

/// 按格式创建读取器
pub fn open_reader(
    format: SourceFormat,
    content: Vec<u8>,
    settings: &ImportSettings,
) -> ImportResult<Box<dyn TabularReader + Send>> {
    match format {
        SourceFormat::Csv => Ok(Box::new(CsvRowReader::new(
            Cursor::new(content),
            settings.csv_delimiter,
        ))),
        SourceFormat::Excel => Ok(Box::new(ExcelRowReader::from_bytes(content)?)),
    }
}

// ==========================================
// CSV 读取器
// ==========================================
pub struct CsvRowReader<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    rows_read: usize,
}

impl<R: Read> CsvRowReader<R> {
    pub fn new(input: R, delimiter: u8) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false) // 表头作为普通行返回
            .flexible(true) // 允许行长度不一致
            .delimiter(delimiter)
            .from_reader(input);

        Self {
            reader,
            record: StringRecord::new(),
            rows_read: 0,
        }
    }
}

impl<R: Read> TabularReader for CsvRowReader<R> {
    fn source_format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn next_row(&mut self) -> ImportResult<Option<RawRow>> {
        if !self.reader.read_record(&mut self.record)? {
            if self.rows_read == 0 {
                return Err(ImportError::EmptyInput(SourceFormat::Csv));
            }
            return Ok(None);
        }

        self.rows_read += 1;
        // 行号取记录起始的物理行，跨行引号字段不会使其漂移
        let row_number = self
            .record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(self.rows_read);
        let cells = self
            .record
            .iter()
            .map(|field| CellValue::Text(field.to_string()))
            .collect();
        Ok(Some(RawRow::new(row_number, cells)))
    }
}

// ==========================================
// Excel 读取器
// ==========================================
// 列号为绝对列号（A 列 = 0），与已用区域起点无关
pub struct ExcelRowReader {
    values: Range<Data>,
    formulas: Option<Range<String>>,
    width: u32,
    next_row: u32,
    end_row: u32,
}

impl ExcelRowReader {
    /// 从 .xlsx 字节内容打开第一个工作表
    pub fn from_bytes(content: Vec<u8>) -> ImportResult<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(content))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::EmptyWorkbook)?;

        let values = workbook.worksheet_range(&sheet_name)?;
        let formulas = match workbook.worksheet_formula(&sheet_name) {
            Ok(range) => Some(range),
            Err(e) => {
                debug!(sheet = %sheet_name, error = %e, "公式读取失败，按单元格值处理");
                None
            }
        };

        // 已用区域取值区域与公式区域的并集
        let mut start = values.start();
        let mut end = values.end();
        if let Some(f) = formulas.as_ref() {
            start = merge_bound(start, f.start(), u32::min);
            end = merge_bound(end, f.end(), u32::max);
        }

        // 首行（第 0 行）必须存在
        let (start_row, _) = start.ok_or(ImportError::MissingHeaderRow)?;
        if start_row != 0 {
            return Err(ImportError::MissingHeaderRow);
        }
        let (end_row, end_col) = end.ok_or(ImportError::MissingHeaderRow)?;

        debug!(
            sheet = %sheet_name,
            rows = end_row + 1,
            columns = end_col + 1,
            "Excel 工作表已加载"
        );

        Ok(Self {
            values,
            formulas,
            width: end_col + 1,
            next_row: 0,
            end_row,
        })
    }

    fn read_cell(&self, row: u32, col: u32) -> CellValue {
        if let Some(formula) = self
            .formulas
            .as_ref()
            .and_then(|f| f.get_value((row, col)))
            .filter(|f| !f.is_empty())
        {
            return CellValue::Formula(formula.clone());
        }

        match self.values.get_value((row, col)) {
            Some(data) => convert_data(data),
            None => CellValue::Empty,
        }
    }

    fn read_row(&self, row: u32) -> RawRow {
        let cells = (0..self.width).map(|col| self.read_cell(row, col)).collect();
        RawRow::new(row as usize + 1, cells)
    }
}

impl TabularReader for ExcelRowReader {
    fn source_format(&self) -> SourceFormat {
        SourceFormat::Excel
    }

    fn next_row(&mut self) -> ImportResult<Option<RawRow>> {
        while self.next_row <= self.end_row {
            let row_idx = self.next_row;
            self.next_row += 1;

            let row = self.read_row(row_idx);
            // 表头行总是返回；数据行全空视为不存在
            if row_idx == 0 || !row.cells.iter().all(CellValue::is_empty) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }
}

fn merge_bound(
    a: Option<(u32, u32)>,
    b: Option<(u32, u32)>,
    pick: fn(u32, u32) -> u32,
) -> Option<(u32, u32)> {
    match (a, b) {
        (Some((ar, ac)), Some((br, bc))) => Some((pick(ar, br), pick(ac, bc))),
        (a, b) => a.or(b),
    }
}

fn convert_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if dt.is_duration() {
                return CellValue::Number(serial);
            }
            match excel_serial_to_date(serial) {
                Some(date) => CellValue::Date { date, serial },
                None => CellValue::Number(serial),
            }
        }
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .and_then(|date| {
                date_to_excel_serial(date).map(|serial| CellValue::Date { date, serial })
            })
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            debug!(error = ?e, "单元格错误值，按空处理");
            CellValue::Empty
        }
    }
}

/// Excel 日期序列号 → 日期（1900 日期系统，忽略时间部分）
///
/// 序列号 60 为不存在的 1900-02-29，之前的序列号需补一天
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    const MAX_SERIAL: f64 = 2_958_465.0; // 9999-12-31
    if !serial.is_finite() || !(1.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }

    let mut days = serial.trunc() as u64;
    if days < 60 {
        days += 1;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

/// 日期 → Excel 序列号（excel_serial_to_date 的逆运算，不含时间部分）
pub fn date_to_excel_serial(date: NaiveDate) -> Option<f64> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let mut days = date.signed_duration_since(base).num_days();
    if days <= 60 {
        days -= 1;
    }
    (days >= 1).then_some(days as f64)
}
