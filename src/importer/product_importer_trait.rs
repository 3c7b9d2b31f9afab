// ==========================================
// 商品目录导入 - 商品导入 Trait
// ==========================================
// 职责: 定义商品批量导入接口（不包含实现）
// ==========================================

use crate::domain::import::{ImportOutcome, UploadedFile};
use async_trait::async_trait;

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 导入单个上传文件
    ///
    /// # 返回
    /// - ImportOutcome: 状态 + 对外消息 + 导入报告（失败时无报告）
    ///
    /// # 导入流程
    /// 1. 按文件名识别格式
    /// 2. 读取表头并解析列映射
    /// 3. 逐行读取（读取异常 → 整批放弃）
    /// 4. 去重（库中快照 + 文件内）
    /// 5. 单事务批量落库
    /// 6. 生成报告
    ///
    /// 所有错误均以 ImportOutcome 返回，不向调用方抛出
    async fn import_batch(&self, file: UploadedFile) -> ImportOutcome;

    /// 并发导入多个文件（各文件互不影响）
    ///
    /// # 返回
    /// - 与输入顺序一致的结果列表
    async fn import_many(&self, files: Vec<UploadedFile>) -> Vec<ImportOutcome>;
}
