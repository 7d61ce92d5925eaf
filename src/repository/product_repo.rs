// ==========================================
// 商品目录导入系统 - 商品数据仓储
// ==========================================
// 职责: 管理 products 表的 CRUD 操作
// 红线: Repository 不含业务逻辑
// 说明: 无唯一键约束，重复导入同一文件会产生重复记录
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::product::{Product, ProductRecord, ScalarValue};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_store::ProductStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, brand, description, category, sku, price, quantity,
           image_url, status, metadata, created_at, updated_at
    FROM products
"#;

// 数据库行的原始形态（时间与元数据为文本，出锁后再转换）
struct ProductRow {
    id: i64,
    name: String,
    brand: Option<String>,
    description: Option<String>,
    category: Option<String>,
    sku: Option<String>,
    price: Option<f64>,
    quantity: Option<f64>,
    image_url: Option<String>,
    status: Option<String>,
    metadata: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ProductRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            brand: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            sku: row.get(5)?,
            price: row.get(6)?,
            quantity: row.get(7)?,
            image_url: row.get(8)?,
            status: row.get(9)?,
            metadata: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn into_product(self) -> RepositoryResult<Product> {
        let metadata = match self.metadata {
            Some(raw) => Some(serde_json::from_str::<BTreeMap<String, ScalarValue>>(&raw)?),
            None => None,
        };

        Ok(Product {
            id: self.id,
            name: self.name,
            brand: self.brand,
            description: self.description,
            category: self.category,
            sku: self.sku,
            price: self.price,
            quantity: self.quantity,
            image_url: self.image_url,
            status: self.status,
            metadata,
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

fn parse_timestamp(field: &str, raw: &str) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: e.to_string(),
        })
}

fn metadata_json(record: &ProductRecord) -> RepositoryResult<Option<String>> {
    match &record.metadata {
        Some(metadata) => Ok(Some(serde_json::to_string(metadata)?)),
        None => Ok(None),
    }
}

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 打开数据库并确保表结构存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn select_by_id(conn: &Connection, id: i64) -> RepositoryResult<Option<Product>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let row = conn
            .query_row(&sql, params![id], ProductRow::from_row)
            .optional()?;
        row.map(ProductRow::into_product).transpose()
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn create(&self, record: &ProductRecord) -> RepositoryResult<Product> {
        let metadata = metadata_json(record)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO products (
                name, brand, description, category, sku, price, quantity,
                image_url, status, metadata, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            "#,
            params![
                record.name,
                record.brand,
                record.description,
                record.category,
                record.sku,
                record.price,
                record.quantity,
                record.image_url,
                record.status,
                metadata,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::select_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Product".to_string(),
            id: id.to_string(),
        })
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        Self::select_by_id(&conn, id)
    }

    async fn update(&self, id: i64, record: &ProductRecord) -> RepositoryResult<Product> {
        let metadata = metadata_json(record)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE products SET
                name = ?1, brand = ?2, description = ?3, category = ?4, sku = ?5,
                price = ?6, quantity = ?7, image_url = ?8, status = ?9, metadata = ?10,
                updated_at = ?11
            WHERE id = ?12
            "#,
            params![
                record.name,
                record.brand,
                record.description,
                record.category,
                record.sku,
                record.price,
                record.quantity,
                record.image_url,
                record.status,
                metadata,
                now,
                id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Product".to_string(),
                id: id.to_string(),
            });
        }

        Self::select_by_id(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Product".to_string(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    async fn list(&self, limit: usize, offset: usize) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY id LIMIT ?1 OFFSET ?2", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![limit as i64, offset as i64], ProductRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn setup() -> (NamedTempFile, ProductRepository) {
        let file = NamedTempFile::new().unwrap();
        let repo = ProductRepository::new(file.path().to_str().unwrap()).unwrap();
        (file, repo)
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let (_file, repo) = setup();

        let mut record = ProductRecord::named("Ванна акриловая");
        record.price = Some(15990.0);
        record.metadata = Some(BTreeMap::from([(
            "Цвет".to_string(),
            ScalarValue::from("белый"),
        )]));

        let created = repo.create(&record).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.price, Some(15990.0));

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(
            found.metadata.unwrap().get("Цвет"),
            Some(&ScalarValue::from("белый"))
        );
    }

    #[tokio::test]
    async fn test_update_delete_list_count() {
        let (_file, repo) = setup();

        let a = repo.create(&ProductRecord::named("Раковина")).await.unwrap();
        let b = repo.create(&ProductRecord::named("Унитаз")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);

        let mut changed = ProductRecord::named("Раковина накладная");
        changed.sku = Some("R-1".to_string());
        let updated = repo.update(a.id, &changed).await.unwrap();
        assert_eq!(updated.name, "Раковина накладная");
        assert_eq!(updated.sku.as_deref(), Some("R-1"));

        let page = repo.list(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, b.id);

        assert!(repo.delete(b.id).await.unwrap());
        assert!(!repo.delete(b.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);

        let missing = repo.update(b.id, &changed).await.unwrap_err();
        assert!(matches!(missing, RepositoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicates_are_allowed() {
        let (_file, repo) = setup();
        let mut record = ProductRecord::named("Смеситель");
        record.sku = Some("SK-1".to_string());

        repo.create(&record).await.unwrap();
        repo.create(&record).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
