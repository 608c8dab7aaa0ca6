use crate::enums::PriceField;
use crate::error::CoreError;
use crate::series::{PriceSeries, TimeSeries, check_ordered};
use chrono::NaiveDateTime;

/// A named numeric column of a [`PriceTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A wide OHLCV-style table: one timestamp axis and any number of named
/// numeric columns of the same length.
///
/// Analytics never read the table directly. Callers pull the columns they need
/// out as [`PriceSeries`], which makes the required-field contract explicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTable {
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl PriceTable {
    pub fn new(timestamps: Vec<NaiveDateTime>) -> Result<Self, CoreError> {
        check_ordered(timestamps.iter().copied())?;
        Ok(Self {
            timestamps,
            columns: Vec::new(),
        })
    }

    /// Adds a column, replacing any existing column with the same name.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), CoreError> {
        if values.len() != self.timestamps.len() {
            return Err(CoreError::LengthMismatch {
                timestamps: self.timestamps.len(),
                values: values.len(),
            });
        }

        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, CoreError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Looks a column up by exact name, then case-insensitively.
    fn find(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .or_else(|| self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Extracts a column as a price series aligned to the table's timestamps.
    pub fn column(&self, name: &str) -> Result<PriceSeries, CoreError> {
        let column = self
            .find(name)
            .ok_or_else(|| CoreError::MissingColumns(vec![name.to_string()]))?;

        TimeSeries::from_parts(self.timestamps.clone(), column.values.clone())
    }

    pub fn field(&self, field: PriceField) -> Result<PriceSeries, CoreError> {
        self.column(field.as_str())
    }

    /// Fails with every absent field named, before any work is done.
    pub fn require(&self, fields: &[PriceField]) -> Result<(), CoreError> {
        let missing: Vec<String> = fields
            .iter()
            .filter(|field| !self.has_column(field.as_str()))
            .map(|field| field.as_str().to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MissingColumns(missing))
        }
    }
}
