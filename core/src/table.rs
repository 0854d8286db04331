//! In-memory customer table.
//!
//! Column-oriented: every column holds one value per row, and all columns
//! share the same length. Column order is the order of the source file and
//! is preserved through every operation, since feature listings and the
//! correlation tie order depend on it.

use crate::{
    error::{InsightsError, InsightsResult},
    types::ColumnName,
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: ColumnName,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.data, ColumnData::Numeric(_))
    }

    /// The grouping key of `row`, as it appears in segment output.
    pub fn key_at(&self, row: usize) -> Option<String> {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).map(|x| format_key(*x)),
            ColumnData::Categorical(v) => v.get(row).cloned(),
        }
    }
}

/// Render a numeric cell as a segment key: integral values print without
/// a fractional part ("2"), everything else in shortest float form.
pub fn format_key(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerTable {
    columns: Vec<Column>,
    rows: usize,
}

impl CustomerTable {
    /// Assemble a table from columns. All columns must have the same length
    /// and distinct names.
    pub fn from_columns(columns: Vec<Column>) -> InsightsResult<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        for (i, col) in columns.iter().enumerate() {
            if col.len() != rows {
                return Err(InsightsError::RaggedColumn {
                    column: col.name.clone(),
                    expected: rows,
                    actual: col.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == col.name) {
                return Err(InsightsError::DuplicateColumn {
                    column: col.name.clone(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> InsightsResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| InsightsError::UnknownColumn {
                column: name.to_string(),
            })
    }

    pub fn numeric(&self, name: &str) -> InsightsResult<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Ok(v),
            ColumnData::Categorical(_) => Err(InsightsError::NotNumeric {
                column: name.to_string(),
            }),
        }
    }

    pub fn categorical(&self, name: &str) -> InsightsResult<&[String]> {
        match &self.column(name)?.data {
            ColumnData::Categorical(v) => Ok(v),
            ColumnData::Numeric(_) => Err(InsightsError::NotCategorical {
                column: name.to_string(),
            }),
        }
    }

    /// Names of all numeric columns, in file order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Remove the named columns if present. Returns the names actually dropped.
    pub fn drop_columns(&mut self, names: &[&str]) -> Vec<String> {
        let mut dropped = Vec::new();
        self.columns.retain(|c| {
            if names.contains(&c.name.as_str()) {
                dropped.push(c.name.clone());
                false
            } else {
                true
            }
        });
        if self.columns.is_empty() {
            self.rows = 0;
        }
        dropped
    }

    /// Write the table as CSV with a header row. Numeric cells use the
    /// segment-key form, so integral values carry no fractional part.
    pub fn write_csv<W: Write>(&self, writer: W) -> InsightsResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        out.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..self.rows {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|c| c.key_at(row).unwrap_or_default())
                .collect();
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CustomerTable {
        CustomerTable::from_columns(vec![
            Column::numeric("CustomerId", vec![101.0, 102.0]),
            Column::categorical("Geography", ["France", "Spain"]),
            Column::numeric("Exited", vec![0.0, 1.0]),
        ])
        .unwrap()
    }

    #[test]
    fn drop_columns_reports_only_present_names() {
        let mut t = table();
        let dropped = t.drop_columns(&["Surname", "CustomerId"]);

        assert_eq!(dropped, vec!["CustomerId".to_string()]);
        assert_eq!(t.column_names(), vec!["Geography", "Exited"]);
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn dropping_every_column_empties_the_table() {
        let mut t = table();
        t.drop_columns(&["CustomerId", "Geography", "Exited"]);

        assert_eq!(t.column_count(), 0);
        assert_eq!(t.row_count(), 0);
    }
}
