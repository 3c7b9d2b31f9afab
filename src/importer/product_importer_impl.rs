// ==========================================
// 商品目录导入 - 商品导入器实现
// ==========================================
// 流程: 识别格式 → 读表头 → 解析表头 → 逐行折叠 → 落库 → 报告
// 红线: 前三个阶段失败时不访问存储；落库前任何异常都不写入
// ==========================================

use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::import::{ImportOutcome, ImportReport, UploadedFile};
use crate::domain::row::RawRow;
use crate::domain::types::SourceFormat;
use crate::importer::batch_assembler::BatchAssembler;
use crate::importer::conflict_handler::DedupGate;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper;
use crate::importer::field_parser::{FieldParser, StandardFieldParser};
use crate::importer::file_parser::{open_reader, rows};
use crate::importer::format_detector::detect_format;
use crate::importer::header_resolver::HeaderResolver;
use crate::importer::product_importer_trait::ProductImporter;
use crate::repository::product_repo::ProductStore;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// 读取完成的文件：列映射 + 全部数据行
struct ParsedFile {
    mapper: FieldMapper,
    rows: Vec<RawRow>,
}

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl<S, C>
where
    S: ProductStore,
    C: ImportConfigReader,
{
    // 数据访问层
    store: S,

    // 配置读取器
    config: C,

    // 数值 / 日期解析
    field_parser: Arc<dyn FieldParser>,
}

impl<S, C> ProductImporterImpl<S, C>
where
    S: ProductStore,
    C: ImportConfigReader,
{
    /// 创建新的 ProductImporter 实例
    ///
    /// # 参数
    /// - store: 商品存储
    /// - config: 配置读取器
    pub fn new(store: S, config: C) -> Self {
        Self {
            store,
            config,
            field_parser: Arc::new(StandardFieldParser),
        }
    }

    /// 替换数值 / 日期解析器
    pub fn with_field_parser(mut self, field_parser: Arc<dyn FieldParser>) -> Self {
        self.field_parser = field_parser;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 执行导入（格式已识别）
    async fn run(&self, format: SourceFormat, content: Vec<u8>) -> ImportResult<ImportReport> {
        let start_time = Instant::now();

        let settings = ImportSettings::load(&self.config)
            .await
            .map_err(|e| ImportError::ConfigReadError {
                key: "import".to_string(),
                message: e.to_string(),
            })?;

        // 读取阶段（同步，读取异常直接放弃）
        let parsed = self.read_file(format, content, &settings)?;
        info!(format = %format, total_rows = parsed.rows.len(), "文件解析完成");

        // 存在性快照（每批一次）
        let names: Vec<String> = parsed
            .rows
            .iter()
            .filter_map(|row| parsed.mapper.product_name(row))
            .collect();
        let existing = self.store.find_existing_names(&names).await?;
        debug!(candidates = names.len(), existing = existing.len(), "存在性检查完成");

        let batch = BatchAssembler::new(&parsed.mapper).assemble(parsed.rows, DedupGate::new(existing));
        info!(
            accepted = batch.products.len(),
            skipped = batch.skipped.len(),
            rejected = batch.rejected.len(),
            "批次组装完成"
        );

        // 落库（单事务）
        let saved = if batch.products.is_empty() {
            Vec::new()
        } else {
            self.store.save_all(batch.products).await?
        };

        Ok(ImportReport {
            source_format: format,
            total_rows: batch.total_rows,
            imported: saved.len(),
            product_ids: saved.into_iter().filter_map(|p| p.id).collect(),
            skipped: batch.skipped,
            rejected_rows: batch.rejected,
            elapsed_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// 读取表头与全部数据行
    fn read_file(
        &self,
        format: SourceFormat,
        content: Vec<u8>,
        settings: &ImportSettings,
    ) -> ImportResult<ParsedFile> {
        let mut reader = open_reader(format, content, settings)?;
        let source_format = reader.source_format();

        let header = reader
            .next_row()?
            .ok_or(ImportError::EmptyInput(source_format))?;
        let header_map = HeaderResolver::resolve(&header, source_format)?;
        let mapper = FieldMapper::new(
            header_map,
            Arc::clone(&self.field_parser),
            settings.date_formats(source_format).to_vec(),
        );

        let rows = rows(reader.as_mut()).collect::<ImportResult<Vec<_>>>()?;
        Ok(ParsedFile { mapper, rows })
    }

    fn reject(file_name: &str, format: Option<SourceFormat>, err: ImportError) -> ImportOutcome {
        let status = err.status();
        let message = err.user_message(format);
        if err.is_structural() {
            warn!(file = %file_name, error = %err, "导入被拒绝");
        } else {
            error!(file = %file_name, error = %err, "导入失败");
        }
        ImportOutcome::rejected(status, message)
    }
}

#[async_trait]
impl<S, C> ProductImporter for ProductImporterImpl<S, C>
where
    S: ProductStore,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file))]
    async fn import_batch(&self, file: UploadedFile) -> ImportOutcome {
        let file_name = file.file_name.clone().unwrap_or_default();

        let format = match detect_format(file.file_name.as_deref()) {
            Ok(format) => format,
            Err(e) => return Self::reject(&file_name, None, e),
        };
        info!(file = %file_name, format = %format, bytes = file.content.len(), "开始导入商品");

        match self.run(format, file.content).await {
            Ok(report) => {
                info!(
                    file = %file_name,
                    imported = report.imported,
                    skipped = report.skipped.len(),
                    elapsed_ms = report.elapsed_ms,
                    "商品导入完成"
                );
                ImportOutcome::completed(report)
            }
            Err(e) => Self::reject(&file_name, Some(format), e),
        }
    }

    async fn import_many(&self, files: Vec<UploadedFile>) -> Vec<ImportOutcome> {
        info!(count = files.len(), "开始批量导入文件");

        let tasks = files.into_iter().map(|file| self.import_batch(file));
        let outcomes = join_all(tasks).await;

        info!(
            total = outcomes.len(),
            success = outcomes.iter().filter(|o| o.is_success()).count(),
            "批量导入完成"
        );
        outcomes
    }
}
