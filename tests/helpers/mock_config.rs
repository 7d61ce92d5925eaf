// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_import::config::ImportConfigReader;
use catalog_import::domain::ExcelRowShape;
use catalog_import::importer::ImportResult;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub max_file_size_bytes: usize,
    pub remote_timeout_secs: u64,
    pub sheet_export_base_url: String,
    pub description_placeholder: Option<String>,
    pub excel_row_shape: ExcelRowShape,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            remote_timeout_secs: 5,
            sheet_export_base_url: "http://127.0.0.1:9".to_string(),
            description_placeholder: None,
            excel_row_shape: ExcelRowShape::HeaderKeyed,
        }
    }
}

impl MockConfig {
    /// Positional 行形态
    pub fn positional() -> Self {
        Self {
            excel_row_shape: ExcelRowShape::Positional,
            ..Self::default()
        }
    }

    /// 带描述占位文本
    pub fn with_placeholder(placeholder: &str) -> Self {
        Self {
            description_placeholder: Some(placeholder.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_max_file_size_bytes(&self) -> ImportResult<usize> {
        Ok(self.max_file_size_bytes)
    }

    async fn get_remote_timeout_secs(&self) -> ImportResult<u64> {
        Ok(self.remote_timeout_secs)
    }

    async fn get_sheet_export_base_url(&self) -> ImportResult<String> {
        Ok(self.sheet_export_base_url.clone())
    }

    async fn get_description_placeholder(&self) -> ImportResult<Option<String>> {
        Ok(self.description_placeholder.clone())
    }

    async fn get_excel_row_shape(&self) -> ImportResult<ExcelRowShape> {
        Ok(self.excel_row_shape)
    }
}
