// ==========================================
// 商品导入API
// ==========================================
// 职责: 导入入口（上传文件 / 远程表格）+ 商品查询
// 红线: MIME 与大小校验在解析之前完成
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::product::{ImportOutcome, Product};
use crate::domain::source::ImportSource;
use crate::i18n::t_with_args;
use crate::importer::{ImportError, ProductImporter, ProductImporterImpl};
use crate::repository::{ProductRepository, ProductStore};
use serde::Serialize;
use tracing::{info, warn};

/// 允许上传的 MIME 类型
pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/csv",
];

/// 导入请求
#[derive(Debug, Clone)]
pub enum ImportRequest {
    /// 上传文件；mime_type 为 None 时跳过 MIME 校验（本地文件）
    File {
        bytes: Vec<u8>,
        filename: String,
        mime_type: Option<String>,
    },
    /// 远程表格（表格 ID 或分享链接）
    Remote { identifier_or_url: String },
}

/// 导入API响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 批次是否完成（行级错误不影响）
    pub success: bool,
    /// 批次结果（totalRows / successfulImports / errors）
    #[serde(flatten)]
    pub outcome: ImportOutcome,
    /// 失败行数
    pub errors_count: usize,
    /// 本地化的汇总说明
    pub message: String,
}

impl ImportApiResponse {
    pub fn from_outcome(outcome: ImportOutcome) -> Self {
        let message = t_with_args(
            "import.summary",
            &[
                ("successful", &outcome.successful_imports.to_string()),
                ("total", &outcome.total_rows.to_string()),
                ("failed", &outcome.failed_rows().to_string()),
            ],
        );

        Self {
            success: true,
            errors_count: outcome.failed_rows(),
            outcome,
            message,
        }
    }
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// 导入商品数据
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 批次完成（可能包含行级错误）
    /// - Err(ApiError): 请求被拒绝或批次级失败
    pub async fn import_products(&self, request: ImportRequest) -> ApiResult<ImportApiResponse> {
        let config = ConfigManager::new(&self.db_path)?;

        // 解析前拒绝: MIME / 大小
        if let ImportRequest::File {
            bytes, mime_type, ..
        } = &request
        {
            check_mime_type(mime_type.as_deref())?;

            let limit = config.get_max_file_size_bytes().await?;
            if bytes.len() > limit {
                warn!(size = bytes.len(), limit, "上传文件超过大小上限");
                return Err(ImportError::FileTooLarge {
                    size: bytes.len(),
                    limit,
                }
                .into());
            }
        }

        let store = ProductRepository::new(&self.db_path)?;
        let importer = ProductImporterImpl::from_config(store, config).await?;

        let outcome = match request {
            ImportRequest::File {
                bytes, filename, ..
            } => importer.import(ImportSource::File { bytes, filename }).await?,
            ImportRequest::Remote { identifier_or_url } => {
                importer.import_remote(&identifier_or_url).await?
            }
        };

        let response = ImportApiResponse::from_outcome(outcome);
        info!(
            total_rows = response.outcome.total_rows,
            errors_count = response.errors_count,
            "导入请求完成"
        );
        Ok(response)
    }

    /// 分页查询商品
    pub async fn list_products(&self, limit: usize, offset: usize) -> ApiResult<Vec<Product>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit должен быть больше 0".to_string()));
        }
        let store = ProductRepository::new(&self.db_path)?;
        Ok(store.list(limit, offset).await?)
    }

    /// 按 id 查询商品
    pub async fn get_product(&self, id: i64) -> ApiResult<Product> {
        let store = ProductRepository::new(&self.db_path)?;
        store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Product(id={})", id)))
    }

    /// 删除商品
    pub async fn delete_product(&self, id: i64) -> ApiResult<()> {
        let store = ProductRepository::new(&self.db_path)?;
        if store.delete(id).await? {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("Product(id={})", id)))
        }
    }

    /// 商品总数
    pub async fn count_products(&self) -> ApiResult<usize> {
        let store = ProductRepository::new(&self.db_path)?;
        Ok(store.count().await?)
    }
}

/// MIME 白名单校验（忽略大小写与参数，如 "text/csv; charset=utf-8"）
fn check_mime_type(mime_type: Option<&str>) -> ApiResult<()> {
    let Some(raw) = mime_type else {
        return Ok(());
    };

    let essence = raw.split(';').next().unwrap_or("").trim().to_lowercase();
    if ALLOWED_MIME_TYPES.contains(&essence.as_str()) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedMimeType(raw.to_string()).into())
    }
}
