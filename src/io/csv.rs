use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::column::{BooleanColumn, Column, Float64Column, Int64Column, StringColumn};
use crate::dataframe::DataFrame;
use crate::error::Result;

/// Read a CSV file into a DataFrame
///
/// Empty fields are missing values. Each column gets the narrowest type
/// that parses every present field: Int64, then Float64, then Boolean,
/// falling back to String.
pub fn read_csv<P: AsRef<Path>>(path: P, has_header: bool) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    read_csv_from_reader(file, has_header)
}

/// Read CSV text into a DataFrame, typed like [`read_csv`]
pub fn read_csv_from_str(text: &str, has_header: bool) -> Result<DataFrame> {
    read_csv_from_reader(text.as_bytes(), has_header)
}

fn read_csv_from_reader<R: Read>(reader: R, has_header: bool) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut headers: Vec<String> = if has_header {
        rdr.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        Vec::new()
    };

    let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        if headers.is_empty() {
            // no header row: name columns after the first record's width
            headers = (0..record.len()).map(|i| format!("column_{}", i)).collect();
            fields = vec![Vec::new(); headers.len()];
        }
        for (i, field) in record.iter().enumerate() {
            if let Some(column) = fields.get_mut(i) {
                column.push((!field.is_empty()).then(|| field.to_string()));
            }
        }
    }

    let mut df = DataFrame::new();
    for (name, values) in headers.into_iter().zip(fields) {
        df.add_column(name, infer_column(values))?;
    }
    Ok(df)
}

fn infer_column(values: Vec<Option<String>>) -> Column {
    let present = || values.iter().flatten();
    let any_present = present().next().is_some();

    if any_present && present().all(|v| v.parse::<i64>().is_ok()) {
        let parsed = values
            .iter()
            .map(|v| v.as_ref().and_then(|s| s.parse().ok()))
            .collect();
        return Int64Column::from_options(parsed).into();
    }

    if any_present && present().all(|v| v.parse::<f64>().is_ok()) {
        let parsed = values
            .iter()
            .map(|v| v.as_ref().and_then(|s| s.parse().ok()))
            .collect();
        return Float64Column::from_options(parsed).into();
    }

    if any_present && present().all(|v| parse_bool(v).is_some()) {
        let parsed = values
            .iter()
            .map(|v| v.as_deref().and_then(parse_bool))
            .collect();
        return BooleanColumn::from_options(parsed).into();
    }

    StringColumn::from_options(values).into()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
