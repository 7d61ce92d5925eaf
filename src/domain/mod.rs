// ==========================================
// 商品目录导入系统 - 领域层
// ==========================================
// 职责: 导入管道的数据结构，不含 IO
// ==========================================

pub mod product;
pub mod source;

// 重导出核心实体
pub use product::{ImportOutcome, ImportRowError, Product, ProductRecord, RawRow, ScalarValue};
pub use source::{ExcelRowShape, FileFormat, ImportSource};
