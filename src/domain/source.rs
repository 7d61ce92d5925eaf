// ==========================================
// 商品目录导入系统 - 导入来源类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// FileFormat - 表格格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Excel, // .xlsx / .xls
    Csv,   // .csv
}

impl FileFormat {
    /// 支持的文件扩展名（用于错误提示）
    pub const SUPPORTED_EXTENSIONS: [&'static str; 3] = ["xlsx", "xls", "csv"];

    /// 根据扩展名识别格式（不区分大小写）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xls" => Some(FileFormat::Excel),
            "csv" => Some(FileFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Excel => f.write_str("excel"),
            FileFormat::Csv => f.write_str("csv"),
        }
    }
}

// ==========================================
// ExcelRowShape - Excel 行形态
// ==========================================
// - Positional: 每行按固定列位置读取，首行（表头）同样作为第 0 行输出
// - HeaderKeyed: 首行为列名，后续行转换为 列名 → 值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExcelRowShape {
    Positional,
    #[default]
    HeaderKeyed,
}

impl FromStr for ExcelRowShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "POSITIONAL" => Ok(ExcelRowShape::Positional),
            "HEADER_KEYED" => Ok(ExcelRowShape::HeaderKeyed),
            other => Err(format!("未知的 Excel 行形态: {}", other)),
        }
    }
}

// ==========================================
// ImportSource - 导入入口
// ==========================================
#[derive(Debug, Clone)]
pub enum ImportSource {
    /// 上传文件（原始字节 + 文件名，格式由扩展名决定）
    File { bytes: Vec<u8>, filename: String },
    /// 远程表格完整分享链接
    RemoteUrl(String),
    /// 远程表格 ID
    RemoteIdentifier(String),
}

impl ImportSource {
    /// 日志用的简短描述
    pub fn describe(&self) -> String {
        match self {
            ImportSource::File { filename, bytes } => {
                format!("file:{} ({} bytes)", filename, bytes.len())
            }
            ImportSource::RemoteUrl(url) => format!("remote-url:{}", url),
            ImportSource::RemoteIdentifier(id) => format!("remote-identifier:{}", id),
        }
    }
}
