// ==========================================
// 商品目录导入系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 → ProductRecord
// 流程: 列名标准化 → 别名解析 → 数值转换 → 元数据收集 → 分类/描述派生
// ==========================================

use crate::domain::product::{ProductRecord, RawRow, ScalarValue};
use crate::importer::alias_table::{FieldAliasTable, TargetField};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::derivation::DerivationService;
use crate::importer::error::RowError;
use crate::importer::product_importer_trait::FieldMapper;
use std::collections::BTreeMap;

pub struct FieldMapperImpl {
    aliases: FieldAliasTable,
    cleaner: DataCleaner,
    derivation: DerivationService,
    description_placeholder: Option<String>,
}

impl FieldMapperImpl {
    pub fn new(aliases: FieldAliasTable, description_placeholder: Option<String>) -> Self {
        Self {
            aliases,
            cleaner: DataCleaner,
            derivation: DerivationService,
            description_placeholder,
        }
    }

    /// 将单个值写入目标字段（数值字段做类型转换，文本字段做 TRIM）
    fn assign(&self, record: &mut ProductRecord, field: TargetField, value: &ScalarValue) {
        if field.is_numeric() {
            let number = self.cleaner.coerce_number(value);
            match field {
                TargetField::Quantity => record.quantity = number,
                _ => record.price = number,
            }
            return;
        }

        let text = self.cleaner.clean_text(value);
        match field {
            TargetField::Name => record.name = text.unwrap_or_default(),
            TargetField::Brand => record.brand = text,
            TargetField::Description => record.description = text,
            TargetField::Category => record.category = text,
            TargetField::Sku => record.sku = text,
            TargetField::ImageUrl => record.image_url = text,
            TargetField::Status => record.status = text,
            TargetField::Price | TargetField::Quantity => {}
        }
    }

    // ==========================================
    // Positional 行: 固定列位置，不做别名匹配
    // ==========================================
    fn map_positional(&self, values: &[ScalarValue]) -> ProductRecord {
        let mut record = ProductRecord::default();
        for (idx, field) in TargetField::ALL.iter().enumerate() {
            if let Some(value) = values.get(idx) {
                self.assign(&mut record, *field, value);
            }
        }
        record
    }

    // ==========================================
    // Keyed 行: 标准化列名索引 + 别名解析
    // ==========================================
    fn map_keyed(&self, pairs: &[(String, ScalarValue)]) -> ProductRecord {
        // 每行构建一次索引；标准化后为空的列名不参与匹配
        let index: Vec<(String, &ScalarValue)> = pairs
            .iter()
            .map(|(label, value)| (self.cleaner.normalize_key(label), value))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        let mut record = ProductRecord::default();
        for (field, aliases) in self.aliases.entries() {
            if let Some(value) = resolve_alias(&index, aliases) {
                self.assign(&mut record, field, value);
            }
        }

        let metadata: BTreeMap<String, ScalarValue> = pairs
            .iter()
            .filter(|(label, value)| !value.is_blank() && !self.aliases.claims(label))
            .map(|(label, value)| (label.clone(), value.clone()))
            .collect();
        if !metadata.is_empty() {
            record.metadata = Some(metadata);
        }

        record
    }
}

impl Default for FieldMapperImpl {
    fn default() -> Self {
        Self::new(FieldAliasTable::standard(), None)
    }
}

impl FieldMapper for FieldMapperImpl {
    fn map_row(&self, row: &RawRow) -> Result<ProductRecord, RowError> {
        let mut record = match row {
            RawRow::Positional(values) => self.map_positional(values),
            RawRow::Keyed(pairs) => self.map_keyed(pairs),
        };

        if record.name.trim().is_empty() {
            return Err(RowError::MissingName);
        }

        if record.category.is_none() {
            record.category = Some(self.derivation.derive_category(&record.name));
        }

        if record.description.is_none() {
            record.description = self.derivation.derive_description(
                record.metadata.as_ref(),
                self.description_placeholder.as_deref(),
            );
        }

        Ok(record)
    }
}

/// 按别名优先级解析字段值
///
/// 每个别名依次尝试: 完全相等 → 列名包含别名 → 别名包含列名；
/// 第一个有任意命中的别名胜出
fn resolve_alias<'a>(
    index: &[(String, &'a ScalarValue)],
    aliases: &[&str],
) -> Option<&'a ScalarValue> {
    for alias in aliases {
        let hit = index
            .iter()
            .find(|(key, _)| key == alias)
            .or_else(|| index.iter().find(|(key, _)| key.contains(alias)))
            .or_else(|| index.iter().find(|(key, _)| alias.contains(key.as_str())));

        if let Some((_, value)) = hit {
            return Some(*value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(pairs: &[(&str, ScalarValue)]) -> RawRow {
        RawRow::Keyed(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_alias_resolution_with_punctuation() {
        let mapper = FieldMapperImpl::default();
        let row = keyed(&[
            ("Название товара", ScalarValue::from("Ванна акриловая")),
            ("ЦЕНА, руб.", ScalarValue::from("1 234,50 руб")),
            ("Остаток", ScalarValue::Number(7.0)),
        ]);

        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.name, "Ванна акриловая");
        assert_eq!(record.price, Some(1234.50));
        assert_eq!(record.quantity, Some(7.0));
        assert_eq!(record.category.as_deref(), Some("Ванны"));
    }

    #[test]
    fn test_unparsable_price_is_absent() {
        let mapper = FieldMapperImpl::default();
        let row = keyed(&[
            ("name", ScalarValue::from("Смеситель для кухни RGW")),
            ("цена", ScalarValue::from("н/д")),
        ]);

        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.price, None);
        assert_eq!(record.category.as_deref(), Some("Смесители"));
    }

    #[test]
    fn test_missing_name() {
        let mapper = FieldMapperImpl::default();
        let row = keyed(&[("name", ScalarValue::from("  ")), ("цена", ScalarValue::from("500"))]);
        assert_eq!(mapper.map_row(&row).unwrap_err(), RowError::MissingName);

        let row = keyed(&[("Вес", ScalarValue::from("12"))]);
        assert_eq!(mapper.map_row(&row).unwrap_err(), RowError::MissingName);
    }

    #[test]
    fn test_supplied_category_is_kept() {
        let mapper = FieldMapperImpl::default();
        let row = keyed(&[
            ("Название", ScalarValue::from("Неизвестный товар")),
            ("Категория", ScalarValue::from(" Аксессуары ")),
        ]);
        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.category.as_deref(), Some("Аксессуары"));

        let row = keyed(&[("Название", ScalarValue::from("Неизвестный товар"))]);
        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.category.as_deref(), Some("Товары"));
    }

    #[test]
    fn test_metadata_holds_unmatched_columns_and_enriches_description() {
        let mapper = FieldMapperImpl::default();
        let row = keyed(&[
            ("Наименование", ScalarValue::from("Раковина накладная")),
            ("Цвет", ScalarValue::from("белый")),
            ("Страна-изготовитель", ScalarValue::from("Россия")),
            ("Вес", ScalarValue::Null),
            ("Артикул", ScalarValue::Number(12345.0)),
        ]);

        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.sku.as_deref(), Some("12345"));

        let metadata = record.metadata.unwrap();
        assert_eq!(metadata.len(), 2);
        assert!(metadata.contains_key("Цвет"));
        assert!(metadata.contains_key("Страна-изготовитель"));
        assert_eq!(
            record.description.as_deref(),
            Some("Цвет: белый, Производство: Россия")
        );
    }

    #[test]
    fn test_description_placeholder() {
        let mapper = FieldMapperImpl::new(
            FieldAliasTable::standard(),
            Some("Описание недоступно".to_string()),
        );
        let row = keyed(&[("name", ScalarValue::from("Унитаз"))]);
        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.description.as_deref(), Some("Описание недоступно"));
        assert_eq!(record.metadata, None);
    }

    #[test]
    fn test_positional_row_uses_fixed_order() {
        let mapper = FieldMapperImpl::default();
        let row = RawRow::Positional(vec![
            ScalarValue::from("Душевая дверь 90"),
            ScalarValue::from("RGW"),
            ScalarValue::Null,
            ScalarValue::Number(15990.0),
            ScalarValue::Null,
            ScalarValue::from("SK-01"),
            ScalarValue::from("3"),
            ScalarValue::from("https://cdn.example.com/1.jpg"),
            ScalarValue::from("в наличии"),
            ScalarValue::from("лишняя колонка"),
        ]);

        let record = mapper.map_row(&row).unwrap();
        assert_eq!(record.brand.as_deref(), Some("RGW"));
        assert_eq!(record.price, Some(15990.0));
        assert_eq!(record.sku.as_deref(), Some("SK-01"));
        assert_eq!(record.quantity, Some(3.0));
        assert_eq!(record.status.as_deref(), Some("в наличии"));
        assert_eq!(record.category.as_deref(), Some("Душевые ограждения"));
        assert_eq!(record.metadata, None);
    }

    #[test]
    fn test_resolve_alias_priority() {
        let a = ScalarValue::from("a");
        let b = ScalarValue::from("b");
        let index = vec![("цена опт".to_string(), &a), ("цена руб".to_string(), &b)];

        // "цена руб" 完全相等优先于首个别名的包含匹配
        assert_eq!(resolve_alias(&index, &["цена руб", "цена"]), Some(&b));
        assert_eq!(resolve_alias(&index, &["стоимость"]), None);
    }
}
