//! # Result Column Metadata
//!
//! This module provides `ColumnMeta`, the per-column metadata a result
//! buffer exposes to clients: alias, source names, declared type, precision,
//! scale, display size, nullability, and the auto-increment flag.
//!
//! Metadata is immutable for the buffer's lifetime; buffers hold the column
//! array behind an `Arc` so shallow copies share it.
//!
//! ## Usage
//!
//! ```ignore
//! use rowspool::types::{ColumnMeta, DataType};
//!
//! let col = ColumnMeta::new("total", DataType::Decimal)
//!     .with_table("orders", Some("public"))
//!     .with_precision(12, 2);
//! assert_eq!(col.alias(), "total");
//! ```

use super::DataType;

/// Column nullability as declared by the producing expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NotNull,
    Nullable,
    Unknown,
}

/// Immutable per-column metadata for a result buffer.
#[derive(Debug, Clone)]
pub struct ColumnMeta {
    alias: String,
    column_name: String,
    table_name: Option<String>,
    schema_name: Option<String>,
    data_type: DataType,
    precision: u64,
    scale: i32,
    display_size: u32,
    nullability: Nullability,
    auto_increment: bool,
}

impl ColumnMeta {
    /// Creates metadata for a column with the given alias and declared type.
    ///
    /// The column name defaults to the alias; precision and display size
    /// default from the type.
    pub fn new(alias: impl Into<String>, data_type: DataType) -> Self {
        let alias = alias.into();
        Self {
            column_name: alias.clone(),
            alias,
            table_name: None,
            schema_name: None,
            data_type,
            precision: data_type.default_precision(),
            scale: 0,
            display_size: data_type.default_display_size(),
            nullability: Nullability::Unknown,
            auto_increment: false,
        }
    }

    /// Sets the underlying column name when it differs from the alias.
    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = name.into();
        self
    }

    /// Sets the source table and schema.
    pub fn with_table(mut self, table: impl Into<String>, schema: Option<&str>) -> Self {
        self.table_name = Some(table.into());
        self.schema_name = schema.map(str::to_owned);
        self
    }

    /// Sets declared precision and scale.
    pub fn with_precision(mut self, precision: u64, scale: i32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// Sets the client display width.
    pub fn with_display_size(mut self, display_size: u32) -> Self {
        self.display_size = display_size;
        self
    }

    /// Sets declared nullability.
    pub fn with_nullability(mut self, nullability: Nullability) -> Self {
        self.nullability = nullability;
        self
    }

    /// Marks the column as auto-increment.
    pub fn with_auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn display_size(&self) -> u32 {
        self.display_size
    }

    pub fn nullability(&self) -> Nullability {
        self.nullability
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_type() {
        let col = ColumnMeta::new("id", DataType::Int8);
        assert_eq!(col.alias(), "id");
        assert_eq!(col.column_name(), "id");
        assert_eq!(col.precision(), DataType::Int8.default_precision());
        assert_eq!(col.display_size(), DataType::Int8.default_display_size());
        assert_eq!(col.nullability(), Nullability::Unknown);
        assert!(!col.is_auto_increment());
    }

    #[test]
    fn builder_overrides() {
        let col = ColumnMeta::new("total", DataType::Decimal)
            .with_column_name("order_total")
            .with_table("orders", Some("public"))
            .with_precision(12, 2)
            .with_nullability(Nullability::NotNull)
            .with_auto_increment();
        assert_eq!(col.column_name(), "order_total");
        assert_eq!(col.table_name(), Some("orders"));
        assert_eq!(col.schema_name(), Some("public"));
        assert_eq!(col.precision(), 12);
        assert_eq!(col.scale(), 2);
        assert_eq!(col.nullability(), Nullability::NotNull);
        assert!(col.is_auto_increment());
    }
}
