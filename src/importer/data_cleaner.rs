// ==========================================
// 商品目录导入系统 - 数据清洗器实现
// ==========================================
// 职责: 列名标准化 / 文本 TRIM + NULL 标准化 / 数值字段类型转换
// ==========================================

use crate::domain::product::ScalarValue;
use once_cell::sync::Lazy;
use regex::Regex;

// 保留: 单词字符、西里尔字母、空白
static NON_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\wа-яё\s]").expect("列名清洗正则无效"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("空白正则无效"));

// 数值字段只保留: 数字、逗号、句点
static NON_NUMERIC_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d.,]").expect("数值清洗正则无效"));

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// 列名标准化: 小写 → TRIM → 去除非单词/非西里尔/非空白字符 → 合并空白
    ///
    /// # 示例
    /// - "ЦЕНА, руб." → "цена руб"
    /// - " Название товара " → "название товара"
    pub fn normalize_key(&self, label: &str) -> String {
        let lowered = label.to_lowercase();
        let stripped = NON_KEY_CHARS.replace_all(lowered.trim(), "");
        WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
    }

    /// 文本字段清洗: TRIM，空白 → None
    pub fn clean_text(&self, value: &ScalarValue) -> Option<String> {
        value.as_trimmed_text()
    }

    /// 数值字段类型转换（price / quantity）
    ///
    /// # 规则
    /// - 数值单元格原样保留
    /// - 文本: 去除数字/逗号/句点以外的字符 → 小数逗号转句点 → 解析前导浮点数
    /// - 无法解析 → None（不视为行错误）
    pub fn coerce_number(&self, value: &ScalarValue) -> Option<f64> {
        match value {
            ScalarValue::Number(n) if n.is_finite() => Some(*n),
            ScalarValue::Text(s) => {
                let digits = NON_NUMERIC_CHARS.replace_all(s, "");
                parse_leading_float(&normalize_decimal_separator(&digits))
            }
            _ => None,
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '.' || c == ','
}

/// 小数分隔符标准化
///
/// - 先去除末尾分隔符（"1234,50." 来自 "1234,50 руб."）
/// - 最后一个分隔符为小数点，其余分隔符视为千分位去除
///   （"1.234,50" → "1234.50"，"1,234.50" → "1234.50"）
/// - 同一分隔符出现多次且无另一种: 全部视为千分位（"1.234.567" → "1234567"）
fn normalize_decimal_separator(value: &str) -> String {
    let trimmed = value.trim_end_matches(is_separator);
    let Some(pos) = trimmed.rfind(is_separator) else {
        return trimmed.to_string();
    };

    let decimal = if trimmed[pos..].starts_with(',') { ',' } else { '.' };
    let other = if decimal == ',' { '.' } else { ',' };
    if trimmed.matches(decimal).count() > 1 && !trimmed.contains(other) {
        return trimmed.replace(decimal, "");
    }

    let (int_part, frac_part) = trimmed.split_at(pos);
    format!("{}.{}", int_part.replace(is_separator, ""), &frac_part[1..])
}

/// 解析前导浮点数（"1.234.5" → 1.234），无数字则 None
fn parse_leading_float(value: &str) -> Option<f64> {
    let mut seen_dot = false;
    let prefix: String = value
        .chars()
        .take_while(|c| {
            if *c == '.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        })
        .collect();

    if !prefix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.trim_end_matches('.').parse::<f64>().ok()
}
