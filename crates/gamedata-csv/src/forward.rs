//! Forward conversion: FieldValue → CSV string.

use gamedata_core::FieldValue;

/// Format of `date` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Format of `timestamp` columns.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single CSV field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvValue(pub String);

impl CsvValue {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&FieldValue> for CsvValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            // Null - empty field
            FieldValue::Null => CsvValue(String::new()),
            FieldValue::Uuid(u) => CsvValue(u.hyphenated().to_string()),
            FieldValue::Text(s) => CsvValue(s.clone()),
            FieldValue::Date(d) => CsvValue(d.format(DATE_FORMAT).to_string()),
            FieldValue::Timestamp(ts) => CsvValue(ts.format(TIMESTAMP_FORMAT).to_string()),
            FieldValue::Int(i) => CsvValue(i.to_string()),
            // Scale is carried by the value, so 12.30 stays "12.30"
            FieldValue::Decimal(d) => CsvValue(d.to_string()),
        }
    }
}

/// Convert a row of fields to CSV strings.
pub fn fields_to_csv_record(fields: &[FieldValue]) -> Vec<String> {
    fields
        .iter()
        .map(|field| CsvValue::from(field).into_inner())
        .collect()
}
