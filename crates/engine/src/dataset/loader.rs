use calamine::{open_workbook, Reader, Xlsx};
use contracts::domain::a001_product_row::{ProductRow, RecordKind};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Ошибки чтения исходного датасета. Все фатальны для прохода:
/// до единого удаленного вызова дело не доходит.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported dataset format: '{0}' (expected .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("failed to parse dataset: {0}")]
    Parse(String),

    #[error("missing required column: '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {detail}")]
    InvalidRow { row: usize, detail: String },
}

/// Колонки исходного файла (имена исторические, из выгрузки)
const COL_NAME: &str = "name";
const COL_KIND: &str = "product_type";
const COL_UNIT: &str = "unit";
const COL_CATEGORY: &str = "category";
const COL_BARCODE: &str = "bar_code";
const COL_BUY_PRICE: &str = "buy_price";
const COL_SALE_PRICE: &str = "sale_price";
const COL_FIRST_QUANTITY: &str = "first_quantity";
const COL_CONVERSION_RATE: &str = "Conversion_rate";

const REQUIRED_COLUMNS: &[&str] = &[COL_NAME, COL_KIND, COL_UNIT, COL_CATEGORY, COL_SALE_PRICE];

// ============================================================================
// Public API
// ============================================================================

/// Прочитать датасет (.xlsx/.xls или .csv) в строки товаров.
///
/// Полностью пустые строки пропускаются; строка с неизвестным кодом
/// `product_type` — ошибка загрузки, а не молчаливый пропуск.
pub fn load_dataset(path: &Path) -> Result<Vec<ProductRow>, DatasetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let (headers, records) = match ext.as_str() {
        "csv" => parse_csv(path)?,
        "xlsx" | "xls" => parse_excel(path)?,
        _ => return Err(DatasetError::UnsupportedFormat(ext)),
    };

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn(column.to_string()));
        }
    }

    rows_from_records(records)
}

// ============================================================================
// Raw parsing (header + records as string maps)
// ============================================================================

type RawRecords = (Vec<String>, Vec<HashMap<String, String>>);

fn parse_csv(path: &Path) -> Result<RawRecords, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::FileNotFound(path.display().to_string()));
    }

    let file = File::open(path).map_err(|e| DatasetError::Parse(e.to_string()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DatasetError::Parse(e.to_string()))?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok((headers, records))
}

fn parse_excel(path: &Path) -> Result<RawRecords, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| DatasetError::Parse(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| DatasetError::Parse("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DatasetError::Parse(e.to_string()))?;

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| DatasetError::Parse("workbook has no data rows".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut records = Vec::new();
    for data_row in rows {
        let mut row_map = HashMap::new();

        for (col_idx, cell) in data_row.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), cell.to_string().trim().to_string());
            }
        }

        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok((headers, records))
}

// ============================================================================
// Typed rows
// ============================================================================

fn rows_from_records(records: Vec<HashMap<String, String>>) -> Result<Vec<ProductRow>, DatasetError> {
    let mut rows = Vec::with_capacity(records.len());

    for (idx, record) in records.into_iter().enumerate() {
        // номер строки в сообщениях — с учетом заголовка, как в файле
        let file_row = idx + 2;

        let name = field(&record, COL_NAME);
        if name.is_empty() {
            return Err(DatasetError::InvalidRow {
                row: file_row,
                detail: "empty product name".to_string(),
            });
        }

        let kind_raw = field(&record, COL_KIND);
        let kind_code: i64 = kind_raw.parse().map_err(|_| DatasetError::InvalidRow {
            row: file_row,
            detail: format!("product_type is not an integer: '{}'", kind_raw),
        })?;
        let kind = RecordKind::from_code(kind_code).ok_or_else(|| DatasetError::InvalidRow {
            row: file_row,
            detail: format!("unsupported record kind {} (expected 1 or 5)", kind_code),
        })?;

        let sale_price = parse_decimal(&record, COL_SALE_PRICE).ok_or_else(|| {
            DatasetError::InvalidRow {
                row: file_row,
                detail: format!("sale_price is not a number: '{}'", field(&record, COL_SALE_PRICE)),
            }
        })?;

        let barcode = match field(&record, COL_BARCODE) {
            b if b.is_empty() => None,
            b => Some(b),
        };

        rows.push(ProductRow {
            name,
            kind,
            unit: field(&record, COL_UNIT),
            category: field(&record, COL_CATEGORY),
            barcode,
            buy_price: parse_decimal(&record, COL_BUY_PRICE).unwrap_or(0.0),
            sale_price,
            first_quantity: parse_decimal(&record, COL_FIRST_QUANTITY).unwrap_or(0.0),
            conversion_rate: parse_decimal(&record, COL_CONVERSION_RATE).unwrap_or(1.0),
        });
    }

    Ok(rows)
}

fn field(record: &HashMap<String, String>, column: &str) -> String {
    record.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_decimal(record: &HashMap<String, String>, column: &str) -> Option<f64> {
    let raw = field(record, column);
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    const HEADER: &str =
        "name,product_type,unit,category,bar_code,buy_price,sale_price,first_quantity,Conversion_rate\n";

    #[test]
    fn test_load_valid_csv() {
        let file = csv_file(&format!(
            "{}Bottle,1,Liter,Drinks,6281001234567,2.5,4.0,10,\nBottle,5,Liter,Drinks,,2.5,40.0,,12\n",
            HEADER
        ));

        let rows = load_dataset(file.path()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].name, "Bottle");
        assert_eq!(rows[0].kind, RecordKind::Base);
        assert_eq!(rows[0].barcode.as_deref(), Some("6281001234567"));
        assert!((rows[0].first_quantity - 10.0).abs() < f64::EPSILON);
        // conversion_rate отсутствует — по умолчанию 1
        assert!((rows[0].conversion_rate - 1.0).abs() < f64::EPSILON);

        assert_eq!(rows[1].kind, RecordKind::Variant);
        assert!(rows[1].barcode.is_none());
        assert!((rows[1].first_quantity - 0.0).abs() < f64::EPSILON);
        assert!((rows[1].conversion_rate - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_record_kind_rejected() {
        let file = csv_file(&format!("{}Widget,3,Piece,Misc,,1,2,,\n", HEADER));

        let err = load_dataset(file.path()).unwrap_err();
        match err {
            DatasetError::InvalidRow { row, detail } => {
                assert_eq!(row, 2);
                assert!(detail.contains("unsupported record kind 3"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let file = csv_file("name,product_type,unit,category\nBottle,1,Liter,Drinks\n");

        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(c) if c == "sale_price"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let file = csv_file(&format!(
            "{}Bottle,1,Liter,Drinks,,1,2,,\n,,,,,,,,\nCrate,1,Box,Drinks,,1,2,,\n",
            HEADER
        ));

        let rows = load_dataset(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let file = csv_file(&format!("{},1,Liter,Drinks,,1,2,,\n", HEADER));

        let err = load_dataset(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRow { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_dataset(Path::new("products.docx")).unwrap_err();
        assert!(matches!(err, DatasetError::UnsupportedFormat(_)));
    }
}
