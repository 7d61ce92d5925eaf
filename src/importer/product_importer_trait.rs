// ==========================================
// 商品目录导入系统 - 商品导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::product::{ImportOutcome, ProductRecord, RawRow};
use crate::domain::source::{FileFormat, ImportSource};
use crate::importer::error::{ImportResult, RowError};
use crate::importer::remote_sheet::SheetReference;
use async_trait::async_trait;

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 按来源类型分派导入
    ///
    /// # 导入流程
    /// 1. 获取数据（文件字节 / 远程 CSV 下载）
    /// 2. 解析为原始行
    /// 3. 逐行: 字段映射 → 校验 → 落库
    /// 4. 汇总 ImportOutcome
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 批次结果（行级错误包含在 errors 中）
    /// - Err: 批次级错误（格式错误、空文件、远程下载失败等）
    async fn import(&self, source: ImportSource) -> ImportResult<ImportOutcome>;

    /// 从上传文件导入（格式由文件扩展名决定）
    async fn import_file(&self, bytes: &[u8], filename: &str) -> ImportResult<ImportOutcome>;

    /// 从远程表格导入（接受表格 ID 或完整分享链接）
    async fn import_remote(&self, identifier_or_url: &str) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 字节 → 原始行（阶段 Parsing）
// 实现者: TabularParser
pub trait FileParser: Send + Sync {
    /// 解析字节为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（空白行同样保留）
    /// - Err(FormatError): 空输入或无法解析
    fn parse(&self, bytes: &[u8], format: FileFormat) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// SheetSource Trait
// ==========================================
// 用途: 远程表格引用解析与下载（阶段 Fetching）
// 实现者: RemoteSheetResolver
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// 解析表格 ID / 分享链接
    fn resolve(&self, identifier_or_url: &str) -> ImportResult<SheetReference>;

    /// 生成 CSV 导出地址
    fn export_url(&self, reference: &SheetReference) -> String;

    /// 下载 CSV 字节
    async fn fetch(&self, export_url: &str) -> ImportResult<Vec<u8>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 原始行 → 商品结构（阶段 MappingRow）
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为 ProductRecord
    ///
    /// # 返回
    /// - Ok(ProductRecord): 映射结果（已完成类型转换与字段派生）
    /// - Err(RowError::MissingName): 无法解析出商品名称
    fn map_row(&self, row: &RawRow) -> Result<ProductRecord, RowError>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 落库前校验（阶段 Validating）
// 实现者: ProductValidator
pub trait RowValidator: Send + Sync {
    /// 校验单条记录
    ///
    /// # 返回
    /// - 违反约束的消息列表（为空表示通过）
    fn validate(&self, record: &ProductRecord) -> Vec<String>;
}
