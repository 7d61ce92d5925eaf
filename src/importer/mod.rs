// ==========================================
// 商品目录导入系统 - 导入层
// ==========================================
// 职责: 外部表格数据导入，生成商品记录
// 支持: Excel, CSV, 远程表格（CSV 导出）
// ==========================================

// 模块声明
pub mod alias_table;
pub mod data_cleaner;
pub mod derivation;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_importer_impl;
pub mod product_importer_trait;
pub mod product_validator;
pub mod remote_sheet;

// 重导出核心类型
pub use alias_table::{FieldAliasTable, TargetField};
pub use data_cleaner::DataCleaner;
pub use derivation::DerivationService;
pub use error::{ImportError, ImportResult, RowError};
pub use field_mapper::FieldMapperImpl;
pub use file_parser::{detect_format, TabularParser};
pub use product_importer_impl::ProductImporterImpl;
pub use product_validator::{ColumnLimits, ProductValidator};
pub use remote_sheet::{RemoteSheetResolver, SheetReference, DEFAULT_EXPORT_BASE_URL};

// 重导出 Trait 接口
pub use product_importer_trait::{
    FieldMapper, FileParser, ProductImporter, RowValidator, SheetSource,
};
