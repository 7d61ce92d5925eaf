// ==========================================
// 商品目录导入系统 - 字段别名表
// ==========================================
// 职责: 目标字段 → 可识别源列名（按优先级排序，小写，俄文/英文混合）
// 红线: 只读静态配置，每行映射时查询
// ==========================================

/// 商品目标字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetField {
    Name,
    Brand,
    Description,
    Price,
    Category,
    Sku,
    Quantity,
    ImageUrl,
    Status,
}

impl TargetField {
    /// 固定声明顺序（同时也是 Positional 行的列位置顺序）
    pub const ALL: [TargetField; 9] = [
        TargetField::Name,
        TargetField::Brand,
        TargetField::Description,
        TargetField::Price,
        TargetField::Category,
        TargetField::Sku,
        TargetField::Quantity,
        TargetField::ImageUrl,
        TargetField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::Name => "name",
            TargetField::Brand => "brand",
            TargetField::Description => "description",
            TargetField::Price => "price",
            TargetField::Category => "category",
            TargetField::Sku => "sku",
            TargetField::Quantity => "quantity",
            TargetField::ImageUrl => "imageUrl",
            TargetField::Status => "status",
        }
    }

    /// 是否需要数值类型转换
    pub fn is_numeric(&self) -> bool {
        matches!(self, TargetField::Price | TargetField::Quantity)
    }
}

// ==========================================
// FieldAliasTable
// ==========================================
pub struct FieldAliasTable {
    entries: &'static [(TargetField, &'static [&'static str])],
}

static DEFAULT_ALIASES: [(TargetField, &[&str]); 9] = [
    (
        TargetField::Name,
        &["название товара", "название", "наименование", "name", "product_name", "товар"],
    ),
    (TargetField::Brand, &["бренд", "brand", "производитель", "марка"]),
    (TargetField::Description, &["описание", "description", "desc"]),
    (
        TargetField::Price,
        &["цена руб", "цена", "price", "стоимость", "cost", "цена рублей"],
    ),
    (TargetField::Category, &["категория", "category", "группа"]),
    (TargetField::Sku, &["артикул", "sku", "код"]),
    (
        TargetField::Quantity,
        &["количество", "quantity", "qty", "остаток", "stock"],
    ),
    (
        TargetField::ImageUrl,
        &["imageurl", "image_url", "image", "изображение", "картинка", "фото"],
    ),
    (TargetField::Status, &["статус", "status", "состояние"]),
];

impl FieldAliasTable {
    /// 默认别名表
    pub fn standard() -> Self {
        Self {
            entries: &DEFAULT_ALIASES,
        }
    }

    /// 按声明顺序遍历 (字段, 别名列表)
    pub fn entries(&self) -> impl Iterator<Item = (TargetField, &'static [&'static str])> + '_ {
        self.entries.iter().map(|(field, aliases)| (*field, *aliases))
    }

    /// 指定字段的别名（优先级顺序）
    pub fn aliases(&self, field: TargetField) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, aliases)| *aliases)
            .unwrap_or(&[])
    }

    /// 原始列名（小写后）包含任一别名时，该列视为已被目标字段认领
    pub fn claims(&self, original_label: &str) -> bool {
        let lower = original_label.to_lowercase();
        self.entries
            .iter()
            .flat_map(|(_, aliases)| aliases.iter())
            .any(|alias| lower.contains(alias))
    }
}

impl Default for FieldAliasTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_aliases() {
        let table = FieldAliasTable::standard();
        for field in TargetField::ALL {
            assert!(!table.aliases(field).is_empty(), "{} 缺少别名", field.as_str());
        }
    }

    #[test]
    fn test_claims_is_case_insensitive_substring() {
        let table = FieldAliasTable::standard();
        assert!(table.claims("ЦЕНА, руб."));
        assert!(table.claims("Название товара"));
        assert!(!table.claims("Цвет"));
        assert!(!table.claims("Страна-изготовитель"));
    }
}
