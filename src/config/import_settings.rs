// ==========================================
// 商品目录导入 - 单次导入配置快照
// ==========================================
// 职责: 导入开始时一次性读取配置，解析过程不再访问配置源
// ==========================================

use crate::config::config_manager::{
    DEFAULT_CSV_DATE_FORMATS, DEFAULT_CSV_DELIMITER, DEFAULT_EXCEL_DATE_FORMATS,
};
use crate::config::import_config_trait::{ConfigError, ImportConfigReader};
use crate::domain::types::SourceFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub csv_delimiter: u8,
    pub csv_date_formats: Vec<String>,
    pub excel_date_formats: Vec<String>,
}

impl ImportSettings {
    /// 从配置源加载
    pub async fn load<C>(config: &C) -> Result<Self, ConfigError>
    where
        C: ImportConfigReader + ?Sized,
    {
        Ok(Self {
            csv_delimiter: config.get_csv_delimiter().await?,
            csv_date_formats: config.get_date_formats(SourceFormat::Csv).await?,
            excel_date_formats: config.get_date_formats(SourceFormat::Excel).await?,
        })
    }

    /// 指定格式下的文本日期格式列表
    pub fn date_formats(&self, format: SourceFormat) -> &[String] {
        match format {
            SourceFormat::Csv => &self.csv_date_formats,
            SourceFormat::Excel => &self.excel_date_formats,
        }
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            csv_delimiter: DEFAULT_CSV_DELIMITER,
            csv_date_formats: DEFAULT_CSV_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            excel_date_formats: DEFAULT_EXCEL_DATE_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_manager::{config_keys, ConfigManager};
    use rusqlite::Connection;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_load_matches_default_on_empty_store() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap();

        let settings = ImportSettings::load(&config).await.unwrap();
        assert_eq!(settings, ImportSettings::default());
    }

    #[tokio::test]
    async fn test_date_formats_by_source() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap();
        config
            .set_config_value(config_keys::EXCEL_DATE_FORMATS, r#"["%m/%d/%Y"]"#)
            .unwrap();

        let settings = ImportSettings::load(&config).await.unwrap();
        assert_eq!(settings.date_formats(SourceFormat::Csv), ["%d-%m-%Y"]);
        assert_eq!(settings.date_formats(SourceFormat::Excel), ["%m/%d/%Y"]);
    }
}
