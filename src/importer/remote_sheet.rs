// ==========================================
// 商品目录导入系统 - 远程表格解析与下载
// ==========================================
// 职责: 表格 ID / 分享链接 → SheetReference → CSV 导出地址 → 字节
// 红线: 只做解析与下载，CSV 内容交给 TabularParser
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_importer_trait::SheetSource;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;
use tracing::{debug, instrument};

pub const DEFAULT_EXPORT_BASE_URL: &str = "https://docs.google.com";

static ID_IN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("表格 ID 正则无效"));

static GID_IN_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#&?]gid=([0-9]+)").expect("gid 正则无效"));

static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("裸 ID 正则无效"));

/// 远程表格引用（表格 ID + 工作表 gid）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReference {
    pub spreadsheet_id: String,
    pub gid: String,
}

// ==========================================
// RemoteSheetResolver
// ==========================================
pub struct RemoteSheetResolver {
    client: reqwest::Client,
    base_url: String,
    max_bytes: usize,
}

impl RemoteSheetResolver {
    /// # 参数
    /// - base_url: 导出服务根地址（末尾斜杠会被去除）
    /// - timeout: 单次请求超时
    /// - max_bytes: 下载内容上限（与上传文件共用同一上限）
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_bytes: usize,
    ) -> ImportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImportError::InternalError(format!("HTTP клиент: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_bytes,
        })
    }
}

#[async_trait]
impl SheetSource for RemoteSheetResolver {
    fn resolve(&self, identifier_or_url: &str) -> ImportResult<SheetReference> {
        let input = identifier_or_url.trim();

        if let Some(caps) = ID_IN_URL.captures(input) {
            let gid = GID_IN_URL
                .captures(input)
                .map(|c| c[1].to_string())
                .unwrap_or_else(|| "0".to_string());
            return Ok(SheetReference {
                spreadsheet_id: caps[1].to_string(),
                gid,
            });
        }

        if BARE_ID.is_match(input) {
            return Ok(SheetReference {
                spreadsheet_id: input.to_string(),
                gid: "0".to_string(),
            });
        }

        Err(ImportError::InvalidReference(identifier_or_url.to_string()))
    }

    fn export_url(&self, reference: &SheetReference) -> String {
        format!(
            "{}/spreadsheets/d/{}/export?format=csv&gid={}",
            self.base_url, reference.spreadsheet_id, reference.gid
        )
    }

    #[instrument(skip(self))]
    async fn fetch(&self, export_url: &str) -> ImportResult<Vec<u8>> {
        let mut response = self.client.get(export_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::RemoteFetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        // 声明长度超限时不下载正文
        if let Some(declared) = response.content_length() {
            let declared = usize::try_from(declared).unwrap_or(usize::MAX);
            if declared > self.max_bytes {
                return Err(ImportError::FileTooLarge {
                    size: declared,
                    limit: self.max_bytes,
                });
            }
        }

        // 未声明长度（chunked）时边读边计数
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(ImportError::FileTooLarge {
                    size: bytes.len() + chunk.len(),
                    limit: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        debug!(size = bytes.len(), "远程表格下载完成");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> RemoteSheetResolver {
        RemoteSheetResolver::new(DEFAULT_EXPORT_BASE_URL, Duration::from_secs(5), 1024).unwrap()
    }

    #[test]
    fn test_resolve_bare_identifier() {
        let reference = resolver().resolve("1AbC-d_EfG").unwrap();
        assert_eq!(reference.spreadsheet_id, "1AbC-d_EfG");
        assert_eq!(reference.gid, "0");
    }

    #[test]
    fn test_resolve_share_url_with_gid() {
        let r = resolver();
        let reference = r
            .resolve("https://docs.google.com/spreadsheets/d/1AbC-d_EfG/edit#gid=5")
            .unwrap();
        assert_eq!(reference.spreadsheet_id, "1AbC-d_EfG");
        assert_eq!(reference.gid, "5");
        assert_eq!(
            r.export_url(&reference),
            "https://docs.google.com/spreadsheets/d/1AbC-d_EfG/export?format=csv&gid=5"
        );

        let reference = r
            .resolve("https://docs.google.com/spreadsheets/d/XYZ/edit?usp=sharing&gid=12")
            .unwrap();
        assert_eq!(reference.gid, "12");
    }

    #[test]
    fn test_resolve_url_without_gid_defaults_to_zero() {
        let reference = resolver()
            .resolve("https://docs.google.com/spreadsheets/d/XYZ/edit")
            .unwrap();
        assert_eq!(reference.gid, "0");
    }

    #[test]
    fn test_resolve_invalid_reference() {
        let r = resolver();
        assert!(matches!(
            r.resolve("https://example.com/not-a-sheet"),
            Err(ImportError::InvalidReference(_))
        ));
        assert!(matches!(r.resolve("   "), Err(ImportError::InvalidReference(_))));
    }

    #[test]
    fn test_export_url_trims_trailing_slash() {
        let r = RemoteSheetResolver::new("http://127.0.0.1:9000/", Duration::from_secs(1), 1024).unwrap();
        let reference = r.resolve("abc").unwrap();
        assert_eq!(
            r.export_url(&reference),
            "http://127.0.0.1:9000/spreadsheets/d/abc/export?format=csv&gid=0"
        );
    }
}
