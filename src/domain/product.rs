// ==========================================
// 商品目录导入 - 商品领域模型
// ==========================================
// 用途: 导入层写入，仓储层持久化
// 对齐: products 表
// ==========================================

use crate::domain::types::ProductField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品记录
// ==========================================
// 红线: name 为去重键（忽略大小写），不允许为空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    // ===== 主键 =====
    pub id: Option<String>, // 由仓储分配（UUID），落库前为 None

    // ===== 基础信息 =====
    pub name: String,
    pub description: String,
    pub image: String,
    pub platforms: String,
    pub genres: String,
    pub developer: String,
    pub publisher: String,

    // ===== 价格与库存 =====
    pub price: f64,    // 非负
    pub discount: f64, // 原样透传，不做 0-1 / 百分比换算
    pub stock: i32,    // 非负

    // ===== 时间信息 =====
    pub release_date: Option<NaiveDate>,
}

// ==========================================
// FieldValue - 单元格强制转换结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Integer(i64),
    Date(Option<NaiveDate>),
}

impl Product {
    /// 以名称创建空白记录，其余字段取默认值
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            image: String::new(),
            platforms: String::new(),
            genres: String::new(),
            developer: String::new(),
            publisher: String::new(),
            price: 0.0,
            discount: 0.0,
            stock: 0,
            release_date: None,
        }
    }

    /// 去重键
    pub fn name_key(&self) -> String {
        name_key(&self.name)
    }

    /// 写入单个字段
    ///
    /// 字段与值类型不匹配时保持默认值；价格 / 库存为负时归零
    pub fn apply(&mut self, field: ProductField, value: FieldValue) {
        match (field, value) {
            (ProductField::Name, FieldValue::Text(v)) => self.name = v,
            (ProductField::Description, FieldValue::Text(v)) => self.description = v,
            (ProductField::Image, FieldValue::Text(v)) => self.image = v,
            (ProductField::Platforms, FieldValue::Text(v)) => self.platforms = v,
            (ProductField::Genres, FieldValue::Text(v)) => self.genres = v,
            (ProductField::Developer, FieldValue::Text(v)) => self.developer = v,
            (ProductField::Publisher, FieldValue::Text(v)) => self.publisher = v,
            (ProductField::Price, FieldValue::Decimal(v)) => {
                self.price = if v.is_finite() && v >= 0.0 { v } else { 0.0 };
            }
            (ProductField::Discount, FieldValue::Decimal(v)) => {
                self.discount = if v.is_finite() { v } else { 0.0 };
            }
            (ProductField::Stock, FieldValue::Integer(v)) => {
                self.stock = i32::try_from(v.max(0)).unwrap_or(i32::MAX);
            }
            (ProductField::ReleaseDate, FieldValue::Date(v)) => self.release_date = v,
            (field, value) => {
                tracing::debug!(field = %field, value = ?value, "字段类型不匹配，保持默认值");
            }
        }
    }
}

/// 名称去重键（忽略大小写）
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_defaults() {
        let product = Product::named("Game A");
        assert_eq!(product.id, None);
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock, 0);
        assert!(product.description.is_empty());
        assert!(product.release_date.is_none());
    }

    #[test]
    fn test_apply_clamps_negative_price_and_stock() {
        let mut product = Product::named("Game A");
        product.apply(ProductField::Price, FieldValue::Decimal(-3.5));
        product.apply(ProductField::Stock, FieldValue::Integer(-2));
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock, 0);

        product.apply(ProductField::Price, FieldValue::Decimal(19.99));
        product.apply(ProductField::Stock, FieldValue::Integer(5));
        assert_eq!(product.price, 19.99);
        assert_eq!(product.stock, 5);
    }

    #[test]
    fn test_apply_keeps_discount_literal() {
        let mut product = Product::named("Game A");
        product.apply(ProductField::Discount, FieldValue::Decimal(15.0));
        assert_eq!(product.discount, 15.0);
        product.apply(ProductField::Discount, FieldValue::Decimal(-0.1));
        assert_eq!(product.discount, -0.1);
    }

    #[test]
    fn test_apply_mismatched_value_is_ignored() {
        let mut product = Product::named("Game A");
        product.apply(ProductField::Price, FieldValue::Text("abc".to_string()));
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_name_key_case_insensitive() {
        assert_eq!(name_key(" Game A "), "game a");
        assert_eq!(Product::named("GAME a").name_key(), "game a");
    }
}
