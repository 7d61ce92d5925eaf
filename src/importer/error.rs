// ==========================================
// 商品目录导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: ImportError = 批次级（终止整个导入）
//       RowError    = 行级（记录到 ImportOutcome.errors，不终止批次）
// ==========================================

use crate::domain::source::FileFormat;
use crate::repository::error::RepositoryError;
use thiserror::Error;

fn supported_formats() -> String {
    FileFormat::SUPPORTED_EXTENSIONS.join(", ")
}

/// 批次级导入错误
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("Неподдерживаемый формат файла: {supplied}. Поддерживаются: {}", supported_formats())]
    UnsupportedFormat { supplied: String },

    #[error("Неподдерживаемый тип файла: {0}. Разрешены: .xlsx, .xls, .csv")]
    UnsupportedMimeType(String),

    #[error("Не удалось разобрать файл ({supplied}): {message}. Ожидаемые форматы: {}", supported_formats())]
    FormatError { supplied: String, message: String },

    #[error("Файл пуст или имеет неверный формат")]
    EmptySource,

    #[error("Файл слишком большой: {size} байт (максимум {limit} байт)")]
    FileTooLarge { size: usize, limit: usize },

    // ===== 远程表格错误 =====
    #[error("Некорректная ссылка на таблицу: {0}")]
    InvalidReference(String),

    #[error("Ошибка загрузки данных: {status} {status_text}")]
    RemoteFetch { status: u16, status_text: String },

    #[error("Удалённая таблица недоступна: {0}")]
    RemoteUnreachable(String),

    // ===== 配置错误 =====
    #[error("Ошибка чтения настройки (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("Некорректное значение настройки (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 存储错误 =====
    #[error("Ошибка хранилища: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("Внутренняя ошибка: {0}")]
    InternalError(String),
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::FormatError {
            supplied: "csv".to_string(),
            message: err.to_string(),
        }
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::FormatError {
            supplied: "excel".to_string(),
            message: err.to_string(),
        }
    }
}

// 实现 From<reqwest::Error>
impl From<reqwest::Error> for ImportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ImportError::RemoteFetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            },
            None => ImportError::RemoteUnreachable(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 行级导入错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Отсутствует обязательное поле \"Название\"")]
    MissingName,

    #[error("Ошибка валидации: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Ошибка сохранения: {0}")]
    Persistence(String),
}

impl RowError {
    /// 展开为 ImportRowError.errors 的消息列表（每条违反的约束一条）
    pub fn messages(&self) -> Vec<String> {
        match self {
            RowError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}
