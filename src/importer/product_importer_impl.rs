// ==========================================
// 商品目录导入系统 - 商品导入器实现
// ==========================================
// 职责: 整合导入流程，从文件/远程表格到数据库
// 流程: 获取 → 解析 → 逐行(映射 → 校验 → 落库) → 汇总
// 红线: 获取/解析失败终止批次；单行失败只记录，不终止
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::product::{ImportOutcome, ImportRowError, Product, RawRow};
use crate::domain::source::{FileFormat, ImportSource};
use crate::importer::alias_table::FieldAliasTable;
use crate::importer::error::{ImportError, ImportResult, RowError};
use crate::importer::field_mapper::FieldMapperImpl;
use crate::importer::file_parser::{detect_format, TabularParser};
use crate::importer::product_importer_trait::{
    FieldMapper, FileParser, ProductImporter, RowValidator, SheetSource,
};
use crate::importer::product_validator::{ColumnLimits, ProductValidator};
use crate::importer::remote_sheet::RemoteSheetResolver;
use crate::repository::ProductStore;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

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

    // 导入组件
    file_parser: Box<dyn FileParser>,
    sheet_source: Box<dyn SheetSource>,
    field_mapper: Box<dyn FieldMapper>,
    validator: Box<dyn RowValidator>,
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
    /// - file_parser: 表格解析器
    /// - sheet_source: 远程表格来源
    /// - field_mapper: 字段映射器
    /// - validator: 行校验器
    pub fn new(
        store: S,
        config: C,
        file_parser: Box<dyn FileParser>,
        sheet_source: Box<dyn SheetSource>,
        field_mapper: Box<dyn FieldMapper>,
        validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            store,
            config,
            file_parser,
            sheet_source,
            field_mapper,
            validator,
        }
    }

    /// 按配置装配默认组件
    ///
    /// 读取: Excel 行形态 / 描述占位文本 / 导出服务地址 / 远程超时 / 大小上限
    pub async fn from_config(store: S, config: C) -> ImportResult<Self> {
        let row_shape = config.get_excel_row_shape().await?;
        let placeholder = config.get_description_placeholder().await?;
        let base_url = config.get_sheet_export_base_url().await?;
        let timeout = Duration::from_secs(config.get_remote_timeout_secs().await?);
        let max_bytes = config.get_max_file_size_bytes().await?;

        debug!(?row_shape, base_url = %base_url, "装配导入组件");

        Ok(Self::new(
            store,
            config,
            Box::new(TabularParser::new(row_shape)),
            Box::new(RemoteSheetResolver::new(base_url, timeout, max_bytes)?),
            Box::new(FieldMapperImpl::new(FieldAliasTable::standard(), placeholder)),
            Box::new(ProductValidator::new(ColumnLimits::default())),
        ))
    }

    /// 访问底层存储
    pub fn store(&self) -> &S {
        &self.store
    }

    // ==========================================
    // 阶段 Fetching + Parsing（上传文件）
    // ==========================================
    async fn read_file(&self, bytes: &[u8], filename: &str) -> ImportResult<Vec<RawRow>> {
        let limit = self.config.get_max_file_size_bytes().await?;
        if bytes.len() > limit {
            return Err(ImportError::FileTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let (format, ext) = detect_format(filename)?;
        debug!(format = %format, ext = %ext, "解析上传文件");

        // 错误信息中展示实际扩展名（xls / xlsx / csv）
        self.file_parser.parse(bytes, format).map_err(|e| match e {
            ImportError::FormatError { message, .. } => ImportError::FormatError {
                supplied: ext.clone(),
                message,
            },
            other => other,
        })
    }

    // ==========================================
    // 阶段 Fetching + Parsing（远程表格）
    // ==========================================
    async fn read_remote(&self, identifier_or_url: &str) -> ImportResult<Vec<RawRow>> {
        let reference = self.sheet_source.resolve(identifier_or_url)?;
        let export_url = self.sheet_source.export_url(&reference);
        debug!(
            spreadsheet_id = %reference.spreadsheet_id,
            gid = %reference.gid,
            "下载远程表格"
        );

        let bytes = self.sheet_source.fetch(&export_url).await?;
        self.file_parser.parse(&bytes, FileFormat::Csv)
    }

    // ==========================================
    // 阶段 MappingRow → Validating → Persisting（单行）
    // ==========================================
    async fn process_row(&self, row: &RawRow) -> Result<Product, RowError> {
        let record = self.field_mapper.map_row(row)?;

        let violations = self.validator.validate(&record);
        if !violations.is_empty() {
            return Err(RowError::Validation(violations));
        }

        self.store
            .create(&record)
            .await
            .map_err(|e| RowError::Persistence(e.to_string()))
    }
}

#[async_trait::async_trait]
impl<S, C> ProductImporter for ProductImporterImpl<S, C>
where
    S: ProductStore + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, source), fields(batch_id = tracing::field::Empty))]
    async fn import(&self, source: ImportSource) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(source = %source.describe(), "开始导入商品数据");

        // === 步骤 1: 获取与解析 ===
        let rows = match &source {
            ImportSource::File { bytes, filename } => self.read_file(bytes, filename).await,
            ImportSource::RemoteUrl(reference) | ImportSource::RemoteIdentifier(reference) => {
                self.read_remote(reference).await
            }
        }
        .map_err(|e| {
            error!(error = %e, "导入来源读取失败");
            e
        })?;

        if rows.is_empty() {
            error!("解析结果为空");
            return Err(ImportError::EmptySource);
        }

        let total_rows = rows.len();
        info!(total_rows, "解析完成");

        // === 步骤 2: 逐行处理（严格顺序） ===
        let mut outcome = ImportOutcome {
            total_rows,
            ..ImportOutcome::default()
        };

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 1;
            match self.process_row(&row).await {
                Ok(product) => {
                    outcome.successful_imports += 1;
                    debug!(row = row_number, product_id = product.id, "行导入成功");
                }
                Err(e) => {
                    warn!(row = row_number, error = %e, "行导入失败");
                    outcome.errors.push(ImportRowError {
                        row: row_number,
                        errors: e.messages(),
                        data: row,
                    });
                }
            }
        }

        info!(
            total_rows = outcome.total_rows,
            successful = outcome.successful_imports,
            failed = outcome.failed_rows(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "导入完成"
        );

        Ok(outcome)
    }

    async fn import_file(&self, bytes: &[u8], filename: &str) -> ImportResult<ImportOutcome> {
        self.import(ImportSource::File {
            bytes: bytes.to_vec(),
            filename: filename.to_string(),
        })
        .await
    }

    async fn import_remote(&self, identifier_or_url: &str) -> ImportResult<ImportOutcome> {
        let trimmed = identifier_or_url.trim();
        let source = if trimmed.contains("://") {
            ImportSource::RemoteUrl(trimmed.to_string())
        } else {
            ImportSource::RemoteIdentifier(trimmed.to_string())
        };
        self.import(source).await
    }
}
