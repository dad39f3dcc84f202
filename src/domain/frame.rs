//! Time-indexed tabular data.
//!
//! A [`Frame`] is the unit of exchange between collectors, the feature
//! engines and the persistence layer: a date index plus insertion-ordered
//! named columns. Numeric columns use `f64::NAN` as the missing-value
//! marker; textual columns hold raw provider cells until they are coerced.

use crate::domain::errors::FrameError;
use chrono::NaiveDate;

/// Backing storage of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Parsed values; `f64::NAN` marks a missing observation.
    Numeric(Vec<f64>),
    /// Raw cells as read from the source; `None` marks a missing observation.
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: ColumnValues,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &ColumnValues {
        &self.values
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.values, ColumnValues::Numeric(_))
    }
}

/// A date-indexed table with named, insertion-ordered columns.
///
/// All mutating operations preserve the row count; transformations that
/// derive new data (returns, scores) insert new columns instead of
/// rewriting existing ones.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The column's values, only if the column exists and is numeric.
    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match &self.column(name)?.values {
            ColumnValues::Numeric(values) => Some(values),
            ColumnValues::Text(_) => None,
        }
    }

    /// Insert a numeric column, replacing any existing column of the same name.
    pub fn insert_numeric(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), FrameError> {
        let name = name.into();
        self.check_length(&name, values.len())?;
        self.insert(Column {
            name,
            values: ColumnValues::Numeric(values),
        });
        Ok(())
    }

    /// Insert a textual column, replacing any existing column of the same name.
    pub fn insert_text(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<(), FrameError> {
        let name = name.into();
        self.check_length(&name, values.len())?;
        self.insert(Column {
            name,
            values: ColumnValues::Text(values),
        });
        Ok(())
    }

    /// Convert a textual column to numeric in place.
    ///
    /// Thousands separators are stripped before parsing; blank cells become
    /// missing values. If any cell fails to parse the column is left
    /// untouched and the offending value is reported. Already-numeric
    /// columns are a no-op.
    pub fn coerce_numeric(&mut self, name: &str) -> Result<(), FrameError> {
        let Some(column) = self.columns.iter_mut().find(|c| c.name == name) else {
            return Err(FrameError::ColumnNotFound {
                name: name.to_string(),
            });
        };
        let ColumnValues::Text(cells) = &column.values else {
            return Ok(());
        };

        let mut parsed = Vec::with_capacity(cells.len());
        for cell in cells {
            match cell {
                None => parsed.push(f64::NAN),
                Some(raw) => {
                    let cleaned = raw.replace(',', "");
                    let trimmed = cleaned.trim();
                    if trimmed.is_empty() {
                        parsed.push(f64::NAN);
                        continue;
                    }
                    match trimmed.parse::<f64>() {
                        Ok(value) => parsed.push(value),
                        Err(_) => {
                            return Err(FrameError::ColumnCoercion {
                                column: name.to_string(),
                                value: raw.clone(),
                            });
                        }
                    }
                }
            }
        }

        column.values = ColumnValues::Numeric(parsed);
        Ok(())
    }

    /// Sort rows by date and collapse duplicate dates (last observation wins).
    pub fn sort_dedup(&mut self) {
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&row| self.index[row]);

        let mut keep: Vec<usize> = Vec::with_capacity(order.len());
        for &row in &order {
            match keep.last_mut() {
                Some(last) if self.index[*last] == self.index[row] => *last = row,
                _ => keep.push(row),
            }
        }

        if keep.len() == self.index.len() && keep.iter().enumerate().all(|(i, &row)| i == row) {
            return;
        }

        self.index = keep.iter().map(|&row| self.index[row]).collect();
        for column in &mut self.columns {
            column.values = match &column.values {
                ColumnValues::Numeric(values) => {
                    ColumnValues::Numeric(keep.iter().map(|&row| values[row]).collect())
                }
                ColumnValues::Text(values) => {
                    ColumnValues::Text(keep.iter().map(|&row| values[row].clone()).collect())
                }
            };
        }
    }

    /// Propagate the last valid observation forward through each column.
    pub fn forward_fill(&mut self) {
        for column in &mut self.columns {
            match &mut column.values {
                ColumnValues::Numeric(values) => {
                    let mut last = f64::NAN;
                    for value in values.iter_mut() {
                        if value.is_nan() {
                            if !last.is_nan() {
                                *value = last;
                            }
                        } else {
                            last = *value;
                        }
                    }
                }
                ColumnValues::Text(values) => {
                    let mut last: Option<String> = None;
                    for value in values.iter_mut() {
                        match value {
                            Some(cell) => last = Some(cell.clone()),
                            None => {
                                if last.is_some() {
                                    *value = last.clone();
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Propagate the first valid observation backward through each column.
    pub fn backward_fill(&mut self) {
        for column in &mut self.columns {
            match &mut column.values {
                ColumnValues::Numeric(values) => {
                    let mut next = f64::NAN;
                    for value in values.iter_mut().rev() {
                        if value.is_nan() {
                            if !next.is_nan() {
                                *value = next;
                            }
                        } else {
                            next = *value;
                        }
                    }
                }
                ColumnValues::Text(values) => {
                    let mut next: Option<String> = None;
                    for value in values.iter_mut().rev() {
                        match value {
                            Some(cell) => next = Some(cell.clone()),
                            None => {
                                if next.is_some() {
                                    *value = next.clone();
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn check_length(&self, name: &str, actual: usize) -> Result<(), FrameError> {
        if actual != self.index.len() {
            return Err(FrameError::LengthMismatch {
                name: name.to_string(),
                expected: self.index.len(),
                actual,
            });
        }
        Ok(())
    }

    fn insert(&mut self, column: Column) {
        if let Some(existing) = self.columns.iter_mut().find(|c| c.name == column.name) {
            *existing = column;
        } else {
            self.columns.push(column);
        }
    }
}
