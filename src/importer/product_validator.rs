// ==========================================
// 商品目录导入系统 - 商品记录校验器实现
// ==========================================
// 职责: 落库前校验（名称非空 / 数值非负且有限 / 图片地址形态 / 列长度上限）
// 红线: 返回全部违反项，不短路
// ==========================================

use crate::domain::product::ProductRecord;
use crate::importer::product_importer_trait::RowValidator;
use url::Url;

/// products 表字符串列长度上限（按字符计）
#[derive(Debug, Clone, Copy)]
pub struct ColumnLimits {
    pub name: usize,
    pub brand: usize,
    pub category: usize,
    pub sku: usize,
    pub image_url: usize,
    pub status: usize,
}

impl Default for ColumnLimits {
    fn default() -> Self {
        Self {
            name: 500,
            brand: 200,
            category: 100,
            sku: 100,
            image_url: 1000,
            status: 50,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductValidator {
    limits: ColumnLimits,
}

impl ProductValidator {
    pub fn new(limits: ColumnLimits) -> Self {
        Self { limits }
    }

    fn check_number(
        value: Option<f64>,
        invalid: &str,
        negative: &str,
        violations: &mut Vec<String>,
    ) {
        if let Some(v) = value {
            if !v.is_finite() {
                violations.push(invalid.to_string());
            } else if v < 0.0 {
                violations.push(negative.to_string());
            }
        }
    }

    fn check_length(label: &str, value: Option<&str>, limit: usize, violations: &mut Vec<String>) {
        if let Some(v) = value {
            let len = v.chars().count();
            if len > limit {
                violations.push(format!(
                    "{}: превышена максимальная длина ({} > {})",
                    label, len, limit
                ));
            }
        }
    }
}

impl RowValidator for ProductValidator {
    fn validate(&self, record: &ProductRecord) -> Vec<String> {
        let mut violations = Vec::new();

        if record.name.trim().is_empty() {
            violations.push("Название товара не может быть пустым".to_string());
        }

        Self::check_number(
            record.price,
            "Цена должна быть числом",
            "Цена не может быть отрицательной",
            &mut violations,
        );
        Self::check_number(
            record.quantity,
            "Количество должно быть числом",
            "Количество не может быть отрицательным",
            &mut violations,
        );

        if let Some(image_url) = record.image_url.as_deref() {
            if !is_url_shaped(image_url) {
                violations.push(format!("Некорректный URL изображения: {}", image_url));
            }
        }

        let limits = &self.limits;
        Self::check_length("Название", Some(record.name.as_str()), limits.name, &mut violations);
        Self::check_length("Бренд", record.brand.as_deref(), limits.brand, &mut violations);
        Self::check_length("Категория", record.category.as_deref(), limits.category, &mut violations);
        Self::check_length("Артикул", record.sku.as_deref(), limits.sku, &mut violations);
        Self::check_length("URL изображения", record.image_url.as_deref(), limits.image_url, &mut violations);
        Self::check_length("Статус", record.status.as_deref(), limits.status, &mut violations);

        violations
    }
}

/// 图片地址形态校验
///
/// - 带协议: http / https / ftp 且包含主机名
/// - 不带协议（如 "cdn.example.com/a.jpg"）: 补 http:// 后主机名需包含 '.'
fn is_url_shaped(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https" | "ftp") && url.host_str().is_some()
        }
        Err(_) => Url::parse(&format!("http://{}", value))
            .ok()
            .and_then(|url| url.host_str().map(|host| host.contains('.')))
            .unwrap_or(false),
    }
}
