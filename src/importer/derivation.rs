// ==========================================
// 商品目录导入系统 - 字段派生服务实现
// ==========================================
// 职责: category / description 缺失时的派生
// ==========================================

use crate::domain::product::ScalarValue;
use std::collections::BTreeMap;

/// 兜底分类
pub const FALLBACK_CATEGORY: &str = "Товары";

// 分类规则（按优先级，首个命中即返回）
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["душевая дверь", "душевой уголок"], "Душевые ограждения"),
    (&["смеситель"], "Смесители"),
    (&["ванна"], "Ванны"),
    (&["раковина", "умывальник"], "Раковины"),
    (&["унитаз"], "Унитазы"),
    (&["душ"], "Душевое оборудование"),
];

// 描述补全来源: (元数据列名, 描述前缀)
const DESCRIPTION_SOURCES: &[(&str, &str)] = &[
    ("цвет", "Цвет"),
    ("страна-изготовитель", "Производство"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DerivationService;

impl DerivationService {
    /// 派生 category
    ///
    /// # 规则
    /// - 商品名称小写后按 CATEGORY_RULES 顺序做子串匹配
    /// - 均未命中 → "Товары"
    pub fn derive_category(&self, name: &str) -> String {
        let lower = name.to_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|(terms, _)| terms.iter().any(|term| lower.contains(term)))
            .map(|(_, category)| category.to_string())
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }

    /// 派生 description
    ///
    /// # 规则
    /// - 从元数据中取 "цвет" / "страна-изготовитель"（列名不区分大小写）
    /// - 拼接为 "Цвет: X, Производство: Y"
    /// - 均缺失 → placeholder（未配置则 None）
    pub fn derive_description(
        &self,
        metadata: Option<&BTreeMap<String, ScalarValue>>,
        placeholder: Option<&str>,
    ) -> Option<String> {
        let parts: Vec<String> = metadata
            .map(|metadata| {
                DESCRIPTION_SOURCES
                    .iter()
                    .filter_map(|(label, prefix)| {
                        lookup_label(metadata, label).map(|value| format!("{}: {}", prefix, value))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if parts.is_empty() {
            placeholder.map(str::to_string)
        } else {
            Some(parts.join(", "))
        }
    }
}

fn lookup_label(metadata: &BTreeMap<String, ScalarValue>, label: &str) -> Option<String> {
    metadata
        .iter()
        .find(|(key, _)| key.trim().to_lowercase() == label)
        .and_then(|(_, value)| value.as_trimmed_text())
}
