// ==========================================
// 商品目录导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::types::SourceFormat;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const CSV_DELIMITER: &str = "import.csv_delimiter";
    pub const CSV_DATE_FORMATS: &str = "import.csv_date_formats";
    pub const EXCEL_DATE_FORMATS: &str = "import.excel_date_formats";
}

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_CSV_DATE_FORMATS: &[&str] = &["%d-%m-%Y"];
pub const DEFAULT_EXCEL_DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            configure_sqlite_connection(&conn_guard)?;
            init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;

        tracing::info!(key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照（按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取 JSON 字符串数组配置，缺失时使用默认值
    fn get_string_list_or_default(
        &self,
        key: &str,
        default: &[&str],
    ) -> Result<Vec<String>, ConfigError> {
        match self.get_config_value(key)? {
            None => Ok(default.iter().map(|s| s.to_string()).collect()),
            Some(raw) => {
                let list: Vec<String> = serde_json::from_str(&raw)
                    .map_err(|e| format!("配置值格式错误 (key: {}, value: {}): {}", key, raw, e))?;
                if list.is_empty() {
                    return Err(format!("配置值不能为空数组 (key: {})", key).into());
                }
                Ok(list)
            }
        }
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_csv_delimiter(&self) -> Result<u8, ConfigError> {
        let raw = match self.get_config_value(config_keys::CSV_DELIMITER)? {
            Some(v) => v,
            None => return Ok(DEFAULT_CSV_DELIMITER),
        };

        // 仅接受单个 ASCII 字符；"\t" 作为制表符写法
        let value = if raw == "\\t" { "\t" } else { raw.as_str() };
        match value.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(format!(
                "配置值格式错误 (key: {}, value: {:?}): 需要单个 ASCII 字符",
                config_keys::CSV_DELIMITER,
                raw
            )
            .into()),
        }
    }

    async fn get_date_formats(&self, format: SourceFormat) -> Result<Vec<String>, ConfigError> {
        match format {
            SourceFormat::Csv => {
                self.get_string_list_or_default(config_keys::CSV_DATE_FORMATS, DEFAULT_CSV_DATE_FORMATS)
            }
            SourceFormat::Excel => self.get_string_list_or_default(
                config_keys::EXCEL_DATE_FORMATS,
                DEFAULT_EXCEL_DATE_FORMATS,
            ),
        }
    }
}
