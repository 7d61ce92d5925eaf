// ==========================================
// 商品目录导入系统 - 商品存储 Trait
// ==========================================
// 职责: 定义商品数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::product::{Product, ProductRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ProductStore Trait
// ==========================================
// 用途: 导入管道的持久化出口
// 实现者: ProductRepository（使用 rusqlite）
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 新建商品记录
    ///
    /// # 返回
    /// - Ok(Product): 含 id 与审计字段的已落库商品
    /// - Err: 数据库错误（仅影响当前行）
    async fn create(&self, record: &ProductRecord) -> RepositoryResult<Product>;

    /// 按 id 查询
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    /// 整体更新（updated_at 刷新）
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    async fn update(&self, id: i64, record: &ProductRecord) -> RepositoryResult<Product>;

    /// 删除，返回是否存在该记录
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;

    /// 分页查询（按 id 升序）
    async fn list(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<Product>>;

    /// 商品总数
    async fn count(&self) -> RepositoryResult<usize>;
}
