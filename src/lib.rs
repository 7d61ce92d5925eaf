// ==========================================
// 商品目录导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 表格（Excel / CSV / 远程表格）→ 商品目录
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "ru");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 导入管道数据结构
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 解析 / 映射 / 校验 / 编排
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    ExcelRowShape, FileFormat, ImportOutcome, ImportRowError, ImportSource, Product,
    ProductRecord, RawRow, ScalarValue,
};

// 导入器
pub use importer::{ImportError, ImportResult, ProductImporter, ProductImporterImpl};

// 仓储
pub use repository::{ProductRepository, ProductStore};

// API
pub use api::{ImportApi, ImportApiResponse, ImportRequest};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Импорт каталога товаров";
