// ==========================================
// 商品目录导入系统 - API 层
// ==========================================
// 职责: 对外业务接口，组装仓储/配置/导入器
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::{ImportApi, ImportApiResponse, ImportRequest, ALLOWED_MIME_TYPES};
