use crate::location::Strand;
use std::fmt;

/// One cell of retrieval output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Int(i64),
    Text(String),
    Strand(Strand),
    Missing,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Strand(s) => write!(f, "{}", s),
            Cell::Missing => write!(f, "NA"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ColumnError {
    InvalidColumn(String),
    ConflictingColumns(String),
}

impl fmt::Display for ColumnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnError::InvalidColumn(s) => write!(f, "Invalid column: {}", s),
            ColumnError::ConflictingColumns(s) => write!(f, "Conflicting columns: {}", s),
        }
    }
}

impl std::error::Error for ColumnError {}

/// A requested output column, as named in a projection spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// feature id; holds the token used (`idx` or `index`).
    Index(String),
    Key,
    /// the full per-segment table: start, end, width and strand.
    Ranges,
    Start,
    End,
    Width,
    Strand,
    /// `database:identifier` pairs, split into one column per database.
    DbXref,
    Qualifier(String),
}

impl Column {
    /// Position in the fixed output order: index, key, ranges, qualifiers.
    fn priority(&self) -> u8 {
        match self {
            Column::Index(_) => 0,
            Column::Key => 1,
            Column::Ranges | Column::Start | Column::End | Column::Width | Column::Strand => 2,
            Column::DbXref | Column::Qualifier(_) => 3,
        }
    }

    fn is_segment_column(&self) -> bool {
        matches!(
            self,
            Column::Start | Column::End | Column::Width | Column::Strand
        )
    }
}

impl TryFrom<&str> for Column {
    type Error = ColumnError;

    fn try_from(s: &str) -> Result<Self, ColumnError> {
        let s = s.trim();
        match s {
            "" => Err(ColumnError::InvalidColumn("empty column name".to_string())),
            "idx" | "index" => Ok(Column::Index(s.to_string())),
            "key" => Ok(Column::Key),
            "location" | "range" => Ok(Column::Ranges),
            "start" => Ok(Column::Start),
            "end" => Ok(Column::End),
            "width" => Ok(Column::Width),
            "strand" => Ok(Column::Strand),
            "db_xref" => Ok(Column::DbXref),
            tag if tag.contains(char::is_whitespace) || tag.contains('=') => {
                Err(ColumnError::InvalidColumn(tag.to_string()))
            }
            tag => Ok(Column::Qualifier(tag.to_string())),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(token) => write!(f, "{}", token),
            Column::Key => write!(f, "key"),
            Column::Ranges => write!(f, "range"),
            Column::Start => write!(f, "start"),
            Column::End => write!(f, "end"),
            Column::Width => write!(f, "width"),
            Column::Strand => write!(f, "strand"),
            Column::DbXref => write!(f, "db_xref"),
            Column::Qualifier(tag) => write!(f, "{}", tag),
        }
    }
}

/// Parse a `;`-separated projection spec into columns in output order.
///
/// `idx` and `index` collapse into one column, repeated tokens are dropped,
/// and `location`/`range` cannot be combined with `start`, `end`, `width`
/// or `strand`.
pub fn parse_columns(spec: &str) -> Result<Vec<Column>, ColumnError> {
    let mut columns: Vec<Column> = Vec::new();
    for token in spec.split(';').filter(|t| !t.trim().is_empty()) {
        let column = Column::try_from(token)?;
        let duplicate = columns.iter().any(|c| match (c, &column) {
            (Column::Index(_), Column::Index(_)) => true,
            (a, b) => a == b,
        });
        if !duplicate {
            columns.push(column);
        }
    }
    if columns.contains(&Column::Ranges) {
        if let Some(c) = columns.iter().find(|c| c.is_segment_column()) {
            return Err(ColumnError::ConflictingColumns(format!(
                "range/location cannot be combined with {}",
                c
            )));
        }
    }
    // stable: tokens keep their relative order within a priority
    columns.sort_by_key(|c| c.priority());
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_columns_priority_order() {
        let cols = parse_columns("gene;key;start;idx;end").unwrap();
        assert_eq!(
            cols,
            vec![
                Column::Index("idx".to_string()),
                Column::Key,
                Column::Start,
                Column::End,
                Column::Qualifier("gene".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_columns_dedup() {
        let cols = parse_columns("index;idx;key;key; ;db_xref").unwrap();
        assert_eq!(
            cols,
            vec![Column::Index("index".to_string()), Column::Key, Column::DbXref]
        );
    }

    #[test]
    fn test_range_conflicts_with_segment_columns() {
        assert!(matches!(
            parse_columns("location;start"),
            Err(ColumnError::ConflictingColumns(_))
        ));
        assert_eq!(parse_columns("range").unwrap(), vec![Column::Ranges]);
    }

    #[test]
    fn test_invalid_column() {
        assert!(matches!(
            parse_columns("gene=abc"),
            Err(ColumnError::InvalidColumn(_))
        ));
        assert!(parse_columns("").unwrap().is_empty());
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Int(4).to_string(), "4");
        assert_eq!(Cell::Strand(Strand::Reverse).to_string(), "-");
        assert_eq!(Cell::Missing.to_string(), "NA");
    }
}
