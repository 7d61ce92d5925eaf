// ==========================================
// 商品目录导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::source::ExcelRowShape;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::remote_sheet::DEFAULT_EXPORT_BASE_URL;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 默认上传文件大小上限: 10 MiB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// 默认远程下载超时（秒）
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

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
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        })?;
        init_schema(&conn).map_err(|e| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self, key: &str) -> ImportResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("блокировка недоступна: {}", e),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.lock(key)?;
        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.lock(key)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> ImportResult<BTreeMap<String, String>> {
        let conn = self.lock("*")?;
        let to_err = |e: rusqlite::Error| ImportError::ConfigReadError {
            key: "*".to_string(),
            message: e.to_string(),
        };

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")
            .map_err(to_err)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(to_err)?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row.map_err(to_err)?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取并解析数值配置；缺失用默认值，非法值报 ConfigValueError
    fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> ImportResult<T> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw.clone(),
                message: "ожидается число".to_string(),
            }),
        }
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_file_size_bytes(&self) -> ImportResult<usize> {
        let value = self.get_parsed(config_keys::MAX_FILE_SIZE_BYTES, DEFAULT_MAX_FILE_SIZE_BYTES)?;
        if value == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::MAX_FILE_SIZE_BYTES.to_string(),
                value: value.to_string(),
                message: "значение должно быть больше нуля".to_string(),
            });
        }
        Ok(value)
    }

    async fn get_remote_timeout_secs(&self) -> ImportResult<u64> {
        let value = self.get_parsed(config_keys::REMOTE_TIMEOUT_SECS, DEFAULT_REMOTE_TIMEOUT_SECS)?;
        if value == 0 {
            return Err(ImportError::ConfigValueError {
                key: config_keys::REMOTE_TIMEOUT_SECS.to_string(),
                value: value.to_string(),
                message: "значение должно быть больше нуля".to_string(),
            });
        }
        Ok(value)
    }

    async fn get_sheet_export_base_url(&self) -> ImportResult<String> {
        let value = match self.get_global_config_value(config_keys::SHEET_EXPORT_BASE_URL)? {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => return Ok(DEFAULT_EXPORT_BASE_URL.to_string()),
        };

        match url::Url::parse(&value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(value),
            _ => Err(ImportError::ConfigValueError {
                key: config_keys::SHEET_EXPORT_BASE_URL.to_string(),
                value,
                message: "ожидается http(s) адрес".to_string(),
            }),
        }
    }

    async fn get_description_placeholder(&self) -> ImportResult<Option<String>> {
        Ok(self
            .get_global_config_value(config_keys::DESCRIPTION_PLACEHOLDER)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    async fn get_excel_row_shape(&self) -> ImportResult<ExcelRowShape> {
        match self.get_global_config_value(config_keys::EXCEL_ROW_SHAPE)? {
            None => Ok(ExcelRowShape::default()),
            Some(raw) => raw.parse::<ExcelRowShape>().map_err(|message| {
                ImportError::ConfigValueError {
                    key: config_keys::EXCEL_ROW_SHAPE.to_string(),
                    value: raw.clone(),
                    message,
                }
            }),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 上传限制
    pub const MAX_FILE_SIZE_BYTES: &str = "import_max_file_size_bytes";

    // 远程表格
    pub const REMOTE_TIMEOUT_SECS: &str = "import_remote_timeout_secs";
    pub const SHEET_EXPORT_BASE_URL: &str = "import_sheet_export_base_url";

    // 映射行为
    pub const DESCRIPTION_PLACEHOLDER: &str = "import_description_placeholder";
    pub const EXCEL_ROW_SHAPE: &str = "import_excel_row_shape"; // POSITIONAL / HEADER_KEYED
}
