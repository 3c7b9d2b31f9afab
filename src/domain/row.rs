// ==========================================
// 商品目录导入 - 原始行结构
// ==========================================
// 用途: 导入管道中间产物（文件读取 → 此结构 → 字段映射）
// 生命周期: 仅在单次导入流程内
// ==========================================

use chrono::NaiveDate;

// ==========================================
// CellValue - 单元格原始值
// ==========================================
// CSV 只产生 Text；Excel 保留单元格声明类型，供字段转换直接使用
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date { date: NaiveDate, serial: f64 }, // 日期格式的数值单元格
    Formula(String), // 公式原文，不求值
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// 单元格文本表示（不做 TRIM）
    ///
    /// - 数值: `42` → `"42.0"`，`19.99` → `"19.99"`
    /// - 布尔: `"true"` / `"false"`
    /// - 日期: 按序列号渲染，`2020-06-01` → `"43983.0"`
    /// - 公式: 公式原文
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => render_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date { serial, .. } => render_number(*serial),
            CellValue::Formula(f) => f.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// 数值渲染：整数值保留一位小数
fn render_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// ==========================================
// RawRow - 原始行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize, // 源文件行号（1 起，含表头行）
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<CellValue>) -> Self {
        Self { row_number, cells }
    }

    /// 取指定列；越界视为空单元格
    pub fn cell(&self, index: usize) -> &CellValue {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
