// ==========================================
// 商品目录导入系统 - API层错误类型
// ==========================================
// 职责: 将导入层/仓储层错误转换为调用方可读的错误
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误（解析前拒绝）
    // ==========================================
    #[error("Некорректный запрос: {0}")]
    InvalidInput(String),

    #[error("Ресурс не найден: {0}")]
    NotFound(String),

    // ==========================================
    // 导入错误（批次级）
    // ==========================================
    #[error("Ошибка импорта: {0}")]
    Import(ImportError),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Ошибка базы данных: {0}")]
    DatabaseError(String),

    #[error("Ошибка подключения к базе данных: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Внутренняя ошибка: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("{}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(e) => e.into(),
            ImportError::UnsupportedMimeType(_) | ImportError::FileTooLarge { .. } => {
                ApiError::InvalidInput(err.to_string())
            }
            other => ApiError::Import(other),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
