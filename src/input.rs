use crate::errors::UptakeModelError;
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use csv::{ReaderBuilder as CsvReaderBuilder, StringRecord, Trim};
use std::ffi::OsStr;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::info;

/// Cell contents (compared case-insensitively) that stand for a missing value in the
/// historical data.
const MISSING_VALUE_MARKERS: [&str; 4] = ["na", "n/a", "#n/a", "nan"];

/// Columns that must be present in the historical data.
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, IntoStaticStr, PartialEq, Eq)]
pub enum HistoricalColumn {
    #[strum(serialize = "elec_price")]
    ElecPrice,
    #[strum(serialize = "elec_price_lag1")]
    ElecPriceLag1,
    #[strum(serialize = "elec_price_lag2")]
    ElecPriceLag2,
    #[strum(serialize = "gas_price")]
    GasPrice,
    #[strum(serialize = "gas_price_lag1")]
    GasPriceLag1,
    #[strum(serialize = "gas_price_lag2")]
    GasPriceLag2,
    #[strum(serialize = "subsidy_level")]
    SubsidyLevel,
    #[strum(serialize = "installations")]
    Installations,
}

impl HistoricalColumn {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// One reporting period of historical data. Any value may be missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoricalRecord {
    pub elec_price: Option<f64>,
    pub elec_price_lag1: Option<f64>,
    pub elec_price_lag2: Option<f64>,
    pub gas_price: Option<f64>,
    pub gas_price_lag1: Option<f64>,
    pub gas_price_lag2: Option<f64>,
    pub subsidy_level: Option<f64>,
    pub installations: Option<f64>,
}

impl HistoricalRecord {
    fn set(&mut self, column: HistoricalColumn, value: Option<f64>) {
        let field = match column {
            HistoricalColumn::ElecPrice => &mut self.elec_price,
            HistoricalColumn::ElecPriceLag1 => &mut self.elec_price_lag1,
            HistoricalColumn::ElecPriceLag2 => &mut self.elec_price_lag2,
            HistoricalColumn::GasPrice => &mut self.gas_price,
            HistoricalColumn::GasPriceLag1 => &mut self.gas_price_lag1,
            HistoricalColumn::GasPriceLag2 => &mut self.gas_price_lag2,
            HistoricalColumn::SubsidyLevel => &mut self.subsidy_level,
            HistoricalColumn::Installations => &mut self.installations,
        };
        *field = value;
    }

    fn from_cells<'a>(
        row: usize,
        positions: &ColumnPositions,
        cell_at: impl Fn(usize) -> RawValue<'a>,
    ) -> Result<Self, UptakeModelError> {
        let mut record = Self::default();
        for (column, &position) in HistoricalColumn::iter().zip(positions.iter()) {
            let raw = cell_at(position);
            let value = raw.parse().ok_or_else(|| UptakeModelError::InvalidValue {
                row,
                column: column.name().to_string(),
                value: raw.to_string(),
            })?;
            record.set(column, value);
        }

        Ok(record)
    }
}

/// Reads historical data from a file, choosing the format by extension: `.csv` files are read
/// as CSV, anything else (`.xlsx`, `.xlsm`, `.xls`, `.ods`, ...) as a spreadsheet whose first
/// worksheet holds the data.
pub fn historical_data_from_path(path: &Path) -> Result<Vec<HistoricalRecord>, UptakeModelError> {
    let is_csv = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        historical_data_from_csv(BufReader::new(File::open(path)?))
    } else {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(UptakeModelError::NoWorksheet)??;
        historical_data_from_range(&range)
    }
}

/// Reads historical data from an `.xlsx` workbook, using its first worksheet.
pub fn historical_data_from_xlsx(
    reader: impl Read + Seek,
) -> Result<Vec<HistoricalRecord>, UptakeModelError> {
    let mut workbook: Xlsx<_> = Xlsx::new(reader).map_err(calamine::Error::from)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(UptakeModelError::NoWorksheet)?
        .map_err(calamine::Error::from)?;

    historical_data_from_range(&range)
}

/// Reads historical data from a worksheet whose first row is the header.
fn historical_data_from_range(range: &Range<Data>) -> Result<Vec<HistoricalRecord>, UptakeModelError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let column_positions = locate_columns(headers.iter().map(|header| header.trim()))?;

    let records = rows
        .enumerate()
        .map(|(i, row)| {
            HistoricalRecord::from_cells(i + 1, &column_positions, |position| {
                row.get(position).map_or(RawValue::Missing, RawValue::from)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Read {} rows of historical data from spreadsheet", records.len());

    Ok(records)
}

/// Reads historical data from a CSV export of the historical spreadsheet.
///
/// The first row must be a header naming at least every [`HistoricalColumn`]; column order does
/// not matter and extra columns are ignored.
pub fn historical_data_from_csv(file: impl Read) -> Result<Vec<HistoricalRecord>, UptakeModelError> {
    let mut reader = CsvReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers: Vec<&str> = reader.headers()?.iter().collect();
    let column_positions = locate_columns(headers.iter().copied())?;

    let mut records = vec![];
    for (i, result) in reader.records().enumerate() {
        let row: StringRecord = result?;
        records.push(HistoricalRecord::from_cells(
            i + 1,
            &column_positions,
            |position| RawValue::Text(row.get(position).unwrap_or_default()),
        )?);
    }

    info!("Read {} rows of historical data", records.len());

    Ok(records)
}

type ColumnPositions = [usize; HistoricalColumn::COUNT];

/// Finds the position of every required column, in [`HistoricalColumn`] order.
fn locate_columns<'a>(
    headers: impl Iterator<Item = &'a str> + Clone,
) -> Result<ColumnPositions, UptakeModelError> {
    let mut positions = [0; HistoricalColumn::COUNT];
    let mut missing = vec![];

    for (idx, column) in HistoricalColumn::iter().enumerate() {
        match headers.clone().position(|header| header == column.name()) {
            Some(position) => positions[idx] = position,
            None => missing.push(column.name().to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(UptakeModelError::MissingColumns(missing));
    }

    Ok(positions)
}

/// Contents of a single cell, before it is interpreted as a value.
#[derive(Clone, Copy, Debug)]
enum RawValue<'a> {
    Number(f64),
    Text(&'a str),
    Missing,
    Unsupported(&'a Data),
}

impl<'a> From<&'a Data> for RawValue<'a> {
    fn from(cell: &'a Data) -> Self {
        match cell {
            Data::Float(value) => RawValue::Number(*value),
            Data::Int(value) => RawValue::Number(*value as f64),
            Data::String(text) => RawValue::Text(text),
            // spreadsheet errors such as #N/A count as missing values
            Data::Empty | Data::Error(_) => RawValue::Missing,
            other => RawValue::Unsupported(other),
        }
    }
}

impl Display for RawValue<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(value) => write!(f, "{value}"),
            RawValue::Text(text) => write!(f, "{text}"),
            RawValue::Missing => Ok(()),
            RawValue::Unsupported(cell) => write!(f, "{cell}"),
        }
    }
}

impl RawValue<'_> {
    /// `Some(None)` is a missing value, `None` means the cell does not hold a usable number.
    fn parse(&self) -> Option<Option<f64>> {
        match *self {
            RawValue::Number(value) => number_value(value),
            RawValue::Text(text) => parse_value(text),
            RawValue::Missing => Some(None),
            RawValue::Unsupported(_) => None,
        }
    }
}

/// Parses a single text cell. `Some(None)` is a missing value, `None` means the cell is not a
/// finite number.
fn parse_value(cell: &str) -> Option<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty()
        || MISSING_VALUE_MARKERS
            .iter()
            .any(|marker| cell.eq_ignore_ascii_case(marker))
    {
        return Some(None);
    }

    cell.parse::<f64>().ok().and_then(number_value)
}

fn number_value(value: f64) -> Option<Option<f64>> {
    if value.is_nan() {
        Some(None)
    } else {
        value.is_finite().then_some(Some(value))
    }
}
