// ==========================================
// 商品目录导入系统 - 商品领域模型
// ==========================================
// 职责: 定义导入管道的中间结构与商品目标结构
// 生命周期: RawRow / ProductRecord 仅在单行处理内存活
//          ImportOutcome 在整个导入批次结束时一次性返回
// ==========================================

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// ScalarValue - 单元格/元数据标量值
// ==========================================
// 红线: 封闭联合类型（字符串 | 数值 | 布尔 | 空），不允许嵌套结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ScalarValue {
    /// 是否为空值（Null 或仅含空白的文本）
    pub fn is_blank(&self) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 转换为去除首尾空白的文本；空值返回 None
    pub fn as_trimmed_text(&self) -> Option<String> {
        if self.is_blank() {
            return None;
        }
        Some(self.to_string().trim().to_string())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            // Excel 中的整数以浮点存储（如 SKU 12345 → 12345.0），输出时去掉 .0
            ScalarValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

// ==========================================
// RawRow - 原始行记录
// ==========================================
// 用途: 文件解析输出，字段映射输入
// - Positional: 按固定列位置读取（Excel 数组模式）
// - Keyed: 列名 → 值（保持源文件列顺序，列名保持原样）
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Positional(Vec<ScalarValue>),
    Keyed(Vec<(String, ScalarValue)>),
}

impl RawRow {
    /// 行内所有值是否均为空
    pub fn is_blank(&self) -> bool {
        match self {
            RawRow::Positional(values) => values.iter().all(ScalarValue::is_blank),
            RawRow::Keyed(pairs) => pairs.iter().all(|(_, v)| v.is_blank()),
        }
    }

    /// 按原始列名取值（Positional 行恒为 None）
    pub fn get(&self, label: &str) -> Option<&ScalarValue> {
        match self {
            RawRow::Positional(_) => None,
            RawRow::Keyed(pairs) => pairs.iter().find(|(k, _)| k == label).map(|(_, v)| v),
        }
    }
}

// 序列化为 JSON 数组 / JSON 对象（对象按源列顺序输出）
impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RawRow::Positional(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for v in values {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            RawRow::Keyed(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (k, v) in pairs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

// ==========================================
// ProductRecord - 商品目标结构（待落库）
// ==========================================
// 红线: name 非空才允许落库，其余字段独立可空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, ScalarValue>>,
}

impl ProductRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ==========================================
// Product - 已落库商品
// ==========================================
// 对齐: products 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<f64>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub metadata: Option<BTreeMap<String, ScalarValue>>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// ImportRowError - 行级导入错误
// ==========================================
// 创建后不可变；row 为 1 起始行号
#[derive(Debug, Clone, Serialize)]
pub struct ImportRowError {
    pub row: usize,
    pub errors: Vec<String>,
    pub data: RawRow,
}

// ==========================================
// ImportOutcome - 导入批次结果
// ==========================================
// 红线: total_rows 恒等于解析器返回的行数（含被拒绝的行）
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub total_rows: usize,
    pub successful_imports: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportOutcome {
    pub fn failed_rows(&self) -> usize {
        self.errors.len()
    }
}
