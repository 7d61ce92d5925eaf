// ==========================================
// 商品目录导入系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::source::ExcelRowShape;
use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 上传限制 =====

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    async fn get_max_file_size_bytes(&self) -> ImportResult<usize>;

    // ===== 远程表格 =====

    /// 获取远程下载超时（秒）
    ///
    /// # 默认值
    /// - 30
    async fn get_remote_timeout_secs(&self) -> ImportResult<u64>;

    /// 获取表格导出服务根地址
    ///
    /// # 默认值
    /// - https://docs.google.com
    async fn get_sheet_export_base_url(&self) -> ImportResult<String>;

    // ===== 映射行为 =====

    /// 获取描述占位文本（元数据无法补全描述时使用）
    ///
    /// # 默认值
    /// - None（描述保持缺失）
    async fn get_description_placeholder(&self) -> ImportResult<Option<String>>;

    /// 获取 Excel 行形态
    ///
    /// # 默认值
    /// - HEADER_KEYED
    async fn get_excel_row_shape(&self) -> ImportResult<ExcelRowShape>;
}
