// ==========================================
// 商品目录导入系统 - 表格解析器实现
// ==========================================
// 职责: 字节 + 声明格式 → 原始行序列（纯转换，无副作用）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::product::{RawRow, ScalarValue};
use crate::domain::source::{ExcelRowShape, FileFormat};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 根据文件名扩展名识别格式
///
/// # 返回
/// - Ok((FileFormat, 扩展名)): 识别成功
/// - Err(UnsupportedFormat): 扩展名不在 xlsx/xls/csv 之内
pub fn detect_format(filename: &str) -> ImportResult<(FileFormat, String)> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match FileFormat::from_extension(&ext) {
        Some(format) => Ok((format, ext)),
        None => Err(ImportError::UnsupportedFormat {
            supplied: if ext.is_empty() { filename.to_string() } else { ext },
        }),
    }
}

// ==========================================
// TabularParser 实现
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TabularParser {
    excel_shape: ExcelRowShape,
}

impl TabularParser {
    pub fn new(excel_shape: ExcelRowShape) -> Self {
        Self { excel_shape }
    }

    fn format_error(format: FileFormat, message: impl Into<String>) -> ImportError {
        ImportError::FormatError {
            supplied: format.to_string(),
            message: message.into(),
        }
    }

    // ==========================================
    // CSV: UTF-8，逗号分隔，支持引号；首行为表头
    // ==========================================
    fn parse_csv(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let bytes = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(Self::format_error(FileFormat::Csv, "пустой файл"));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Self::format_error(FileFormat::Csv, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(Self::format_error(FileFormat::Csv, "отсутствует строка заголовков"));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| Self::format_error(FileFormat::Csv, e.to_string()))?;
            let pairs = headers
                .iter()
                .enumerate()
                .filter(|(_, header)| !header.trim().is_empty())
                .map(|(idx, header)| {
                    let value = record
                        .get(idx)
                        .map(ScalarValue::from)
                        .unwrap_or(ScalarValue::Null);
                    (header.clone(), value)
                })
                .collect();
            rows.push(RawRow::Keyed(pairs));
        }

        Ok(rows)
    }

    // ==========================================
    // Excel: 读取声明顺序中的第一个工作表
    // ==========================================
    fn parse_excel(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        if bytes.is_empty() {
            return Err(Self::format_error(FileFormat::Excel, "пустой файл"));
        }

        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| Self::format_error(FileFormat::Excel, e.to_string()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Self::format_error(FileFormat::Excel, "книга не содержит листов"))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| Self::format_error(FileFormat::Excel, e.to_string()))?;

        // Range 从首个非空单元格开始；补齐左侧空列，保证固定列位置从 A 列起算
        let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let mut cells = range.rows().map(|row| {
            let mut values = vec![ScalarValue::Null; leading_cols];
            values.extend(row.iter().map(cell_to_scalar));
            values
        });

        let rows = match self.excel_shape {
            ExcelRowShape::Positional => cells.map(RawRow::Positional).collect(),
            ExcelRowShape::HeaderKeyed => {
                let headers: Vec<String> = match cells.next() {
                    Some(header_row) => header_row.iter().map(|v| v.to_string()).collect(),
                    None => return Ok(Vec::new()),
                };

                cells
                    .map(|values| {
                        let pairs = headers
                            .iter()
                            .enumerate()
                            .filter(|(_, header)| !header.trim().is_empty())
                            .map(|(idx, header)| {
                                let value = values.get(idx).cloned().unwrap_or(ScalarValue::Null);
                                (header.clone(), value)
                            })
                            .collect();
                        RawRow::Keyed(pairs)
                    })
                    .collect()
            }
        };

        Ok(rows)
    }
}

impl FileParser for TabularParser {
    fn parse(&self, bytes: &[u8], format: FileFormat) -> ImportResult<Vec<RawRow>> {
        match format {
            FileFormat::Csv => self.parse_csv(bytes),
            FileFormat::Excel => self.parse_excel(bytes),
        }
    }
}

/// calamine 单元格 → 标量值
fn cell_to_scalar(cell: &Data) -> ScalarValue {
    match cell {
        Data::Empty | Data::Error(_) => ScalarValue::Null,
        Data::String(s) => ScalarValue::Text(s.clone()),
        Data::Float(f) => ScalarValue::Number(*f),
        Data::Int(i) => ScalarValue::Number(*i as f64),
        Data::Bool(b) => ScalarValue::Bool(*b),
        other => ScalarValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn build_xlsx(rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        {
            let sheet = workbook.add_worksheet();
            for (r, row) in rows.iter().enumerate() {
                for (c, value) in row.iter().enumerate() {
                    if value.is_empty() {
                        continue;
                    }
                    match value.parse::<f64>() {
                        Ok(n) => sheet.write_number(r as u32, c as u16, n).unwrap(),
                        Err(_) => sheet.write_string(r as u32, c as u16, *value).unwrap(),
                    };
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("товары.XLSX").unwrap().0, FileFormat::Excel);
        assert_eq!(detect_format("price.csv").unwrap(), (FileFormat::Csv, "csv".to_string()));

        let err = detect_format("report.pdf").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat { ref supplied } if supplied == "pdf"));
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let csv = "Название,Цена\nВанна,\"15990,00\"\nСмеситель,5400\n";
        let rows = TabularParser::default().parse(csv.as_bytes(), FileFormat::Csv).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Название"), Some(&ScalarValue::from("Ванна")));
        assert_eq!(rows[0].get("Цена"), Some(&ScalarValue::from("15990,00")));
    }

    #[test]
    fn test_csv_parser_keeps_blank_rows() {
        let csv = "name,price\nВанна,100\n,\n";
        let rows = TabularParser::default().parse(csv.as_bytes(), FileFormat::Csv).unwrap();

        // 空白行由映射阶段处理，解析器原样保留
        assert_eq!(rows.len(), 2);
        assert!(rows[1].is_blank());
    }

    #[test]
    fn test_csv_parser_strips_bom_and_short_rows() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("name,brand,sku\nВанна\n".as_bytes());
        let rows = TabularParser::default().parse(&bytes, FileFormat::Csv).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&ScalarValue::from("Ванна")));
        assert_eq!(rows[0].get("sku"), Some(&ScalarValue::Null));
    }

    #[test]
    fn test_csv_parser_empty_input() {
        let err = TabularParser::default().parse(b"", FileFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::FormatError { .. }));
    }

    #[test]
    fn test_csv_parser_invalid_utf8() {
        let bytes = b"name,price\n\xff\xfe,1\n";
        let err = TabularParser::default().parse(bytes, FileFormat::Csv).unwrap_err();
        assert!(matches!(err, ImportError::FormatError { .. }));
    }

    #[test]
    fn test_excel_parser_header_keyed() {
        let bytes = build_xlsx(&[&["Название", "Цена"], &["Ванна", "15990.5"], &["", ""]]);
        let rows = TabularParser::new(ExcelRowShape::HeaderKeyed)
            .parse(&bytes, FileFormat::Excel)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Название"), Some(&ScalarValue::from("Ванна")));
        assert_eq!(rows[0].get("Цена"), Some(&ScalarValue::Number(15990.5)));
    }

    #[test]
    fn test_excel_parser_positional_includes_header_row() {
        let bytes = build_xlsx(&[&["Название", "Бренд"], &["Ванна", "RGW"]]);
        let rows = TabularParser::new(ExcelRowShape::Positional)
            .parse(&bytes, FileFormat::Excel)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1],
            RawRow::Positional(vec![ScalarValue::from("Ванна"), ScalarValue::from("RGW")])
        );
    }

    #[test]
    fn test_excel_parser_rejects_garbage() {
        let err = TabularParser::default()
            .parse(b"definitely not a workbook", FileFormat::Excel)
            .unwrap_err();
        assert!(matches!(err, ImportError::FormatError { .. }));
    }
}
