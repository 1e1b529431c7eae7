use crate::column::{parse_columns, Cell, Column, ColumnError};
use crate::feature::{Feature, FeatureList};
use hashbrown::HashSet;

/// A rectangular table of cells with named columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    names: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// implement Iteration for Table to get each row
impl<'a> IntoIterator for &'a Table {
    type Item = &'a Vec<Cell>;
    type IntoIter = std::slice::Iter<'a, Vec<Cell>>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// implement Indexing for Table to get each row
impl std::ops::Index<usize> for Table {
    type Output = Vec<Cell>;
    fn index(&self, index: usize) -> &Self::Output {
        &self.rows[index]
    }
}

impl Table {
    /// Create a table; every row must have one cell per name.
    pub fn new(names: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == names.len()));
        Self { names, rows }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ncol(&self) -> usize {
        self.names.len()
    }

    /// All cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let i = self.names.iter().position(|n| n == name)?;
        Some(self.rows.iter().map(|r| &r[i]).collect())
    }
}

/// The rows produced for one feature when some column has several values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRows {
    pub id: u64,
    pub table: Table,
}

/// Result of a retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    /// the input, for an empty projection spec.
    Features(FeatureList),
    /// one column with one value per feature.
    Sequence(Vec<Cell>),
    /// one row per feature.
    Table(Table),
    /// one table per feature, used when a column has several values for a feature.
    Grouped(Vec<FeatureRows>),
}

impl Retrieved {
    pub fn is_grouped(&self) -> bool {
        matches!(self, Retrieved::Grouped(_))
    }

    /// Flatten any shape into a single table. `name` labels a bare sequence.
    pub fn into_table(self, name: &str) -> Option<Table> {
        match self {
            Retrieved::Features(_) => None,
            Retrieved::Sequence(cells) => Some(Table::new(
                vec![name.to_string()],
                cells.into_iter().map(|c| vec![c]).collect(),
            )),
            Retrieved::Table(t) => Some(t),
            Retrieved::Grouped(groups) => {
                let names = groups
                    .first()
                    .map(|g| g.table.names.clone())
                    .unwrap_or_default();
                let rows = groups.into_iter().flat_map(|g| g.table.rows).collect();
                Some(Table::new(names, rows))
            }
        }
    }
}

/// Where the values of an output column come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Id,
    Key,
    Start,
    End,
    Width,
    Strand,
    Qualifier(String),
    Xref(String),
}

struct OutputColumn {
    name: String,
    source: Source,
}

fn split_xref(value: &str) -> Option<(&str, &str)> {
    value.split_once(':')
}

/// Database names of all `db_xref` values, in first-seen order.
fn xref_databases(features: &FeatureList) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut dbs: Vec<String> = Vec::new();
    for f in features {
        for value in f.qualifier("db_xref") {
            match split_xref(value) {
                Some((db, _)) => {
                    if seen.insert(db) {
                        dbs.push(db.to_string());
                    }
                }
                None => log::warn!("feature {}: db_xref {:?} has no database prefix", f.id, value),
            }
        }
    }
    dbs
}

fn output_columns(columns: &[Column], features: &FeatureList) -> Vec<OutputColumn> {
    let mut out = Vec::new();
    let mut push = |name: &str, source: Source| {
        out.push(OutputColumn {
            name: name.to_string(),
            source,
        })
    };
    for column in columns {
        match column {
            Column::Index(token) => push(token, Source::Id),
            Column::Key => push("key", Source::Key),
            Column::Ranges => {
                push("start", Source::Start);
                push("end", Source::End);
                push("width", Source::Width);
                push("strand", Source::Strand);
            }
            Column::Start => push("start", Source::Start),
            Column::End => push("end", Source::End),
            Column::Width => push("width", Source::Width),
            Column::Strand => push("strand", Source::Strand),
            Column::DbXref => {
                let dbs = xref_databases(features);
                if dbs.is_empty() {
                    push("db_xref", Source::Qualifier("db_xref".to_string()));
                }
                for db in dbs {
                    push(&db, Source::Xref(db.clone()));
                }
            }
            Column::Qualifier(tag) => push(tag, Source::Qualifier(tag.clone())),
        }
    }
    out
}

fn or_missing(cells: Vec<Cell>) -> Vec<Cell> {
    if cells.is_empty() {
        vec![Cell::Missing]
    } else {
        cells
    }
}

/// The values of one column for one feature: one cell, or one per segment
/// or per repeated qualifier.
fn cells(feature: &Feature, source: &Source) -> Vec<Cell> {
    let location = &feature.location;
    match source {
        Source::Id => vec![Cell::Int(feature.id as i64)],
        Source::Key => vec![Cell::Text(feature.key.clone())],
        Source::Start => location.starts().into_iter().map(Cell::Int).collect(),
        Source::End => location.ends().into_iter().map(Cell::Int).collect(),
        Source::Width => location.widths().into_iter().map(Cell::Int).collect(),
        Source::Strand => location.strands().into_iter().map(Cell::Strand).collect(),
        Source::Qualifier(tag) => or_missing(
            feature
                .qualifier(tag)
                .iter()
                .map(|v| Cell::Text(v.clone()))
                .collect(),
        ),
        Source::Xref(db) => or_missing(
            feature
                .qualifier("db_xref")
                .iter()
                .filter_map(|v| split_xref(v))
                .filter(|(d, _)| *d == db.as_str())
                .map(|(_, id)| Cell::Text(id.to_string()))
                .collect(),
        ),
    }
}

/// Expand one feature's column values into rows. Single values repeat down
/// the rows, shorter columns are padded with missing cells.
fn feature_rows(values: Vec<Vec<Cell>>) -> Vec<Vec<Cell>> {
    let n = values.iter().map(|v| v.len()).max().unwrap_or(1);
    (0..n)
        .map(|i| {
            values
                .iter()
                .map(|v| match v.len() {
                    1 => v[0].clone(),
                    _ => v.get(i).cloned().unwrap_or(Cell::Missing),
                })
                .collect()
        })
        .collect()
}

/// Tabulate `features` according to a projection spec such as `"idx;key;gene"`.
pub fn retrieve(features: &FeatureList, spec: &str) -> Result<Retrieved, ColumnError> {
    let columns = parse_columns(spec)?;
    if columns.is_empty() {
        return Ok(Retrieved::Features(features.clone()));
    }
    let outputs = output_columns(&columns, features);
    let names: Vec<String> = outputs.iter().map(|c| c.name.clone()).collect();

    let per_feature: Vec<Vec<Vec<Cell>>> = features
        .iter()
        .map(|f| outputs.iter().map(|c| cells(f, &c.source)).collect())
        .collect();
    let multi = per_feature.iter().flatten().any(|v| v.len() > 1);

    if !multi {
        let rows: Vec<Vec<Cell>> = per_feature
            .into_iter()
            .map(|vals| vals.into_iter().flatten().collect())
            .collect();
        if names.len() == 1 {
            return Ok(Retrieved::Sequence(rows.into_iter().flatten().collect()));
        }
        return Ok(Retrieved::Table(Table::new(names, rows)));
    }

    log::debug!("multi-valued columns, grouping {} features", features.len());
    let groups = features
        .iter()
        .zip(per_feature)
        .map(|(f, vals)| FeatureRows {
            id: f.id,
            table: Table::new(names.clone(), feature_rows(vals)),
        })
        .collect();
    Ok(Retrieved::Grouped(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Strand;
    use crate::tests::feature_fixtures::parse_features;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_retrieve_idx_key_table() {
        let list = parse_features("1 CDS 1..10\n2 gene 20..30");
        let out = retrieve(&list, "idx;key").unwrap();
        let expected = Table::new(
            vec!["idx".to_string(), "key".to_string()],
            vec![vec![Cell::Int(1), text("CDS")], vec![Cell::Int(2), text("gene")]],
        );
        assert_eq!(out, Retrieved::Table(expected));
    }

    #[test]
    fn test_retrieve_single_column_is_sequence() {
        let list = parse_features("1 CDS 1..10 gene=a\n2 gene 20..30");
        assert_eq!(
            retrieve(&list, "key").unwrap(),
            Retrieved::Sequence(vec![text("CDS"), text("gene")])
        );
        assert_eq!(
            retrieve(&list, "gene").unwrap(),
            Retrieved::Sequence(vec![text("a"), Cell::Missing])
        );
    }

    #[test]
    fn test_retrieve_empty_spec_returns_input() {
        let list = parse_features("1 CDS 1..10");
        assert_eq!(retrieve(&list, "").unwrap(), Retrieved::Features(list.clone()));
    }

    #[test]
    fn test_retrieve_db_xref_expands() {
        let list = parse_features("7 CDS 1..10 db_xref=GI:12345;db_xref=taxon:9606");
        let out = retrieve(&list, "db_xref").unwrap();
        let expected = Table::new(
            vec!["GI".to_string(), "taxon".to_string()],
            vec![vec![text("12345"), text("9606")]],
        );
        assert_eq!(out, Retrieved::Table(expected));
    }

    #[test]
    fn test_retrieve_db_xref_in_place_with_missing() {
        let list = parse_features(
            "
            1 CDS 1..10 db_xref=GI:1;gene=a
            2 CDS 20..30 db_xref=GeneID:2;gene=b
            ",
        );
        let table = retrieve(&list, "idx;db_xref;gene")
            .unwrap()
            .into_table("x")
            .unwrap();
        assert_eq!(table.names(), &["idx", "GI", "GeneID", "gene"]);
        assert_eq!(table.column("GI").unwrap(), vec![&text("1"), &Cell::Missing]);
        assert_eq!(table.column("GeneID").unwrap(), vec![&Cell::Missing, &text("2")]);
    }

    #[test]
    fn test_retrieve_ranges_grouped() {
        let list = parse_features(
            "
            1 CDS complement(join(1..10,21..30))
            2 gene 40..50
            ",
        );
        let out = retrieve(&list, "idx;key;location").unwrap();
        let groups = match out {
            Retrieved::Grouped(g) => g,
            other => panic!("expected grouped output, got {:?}", other),
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, 1);
        assert_eq!(
            groups[0].table.names(),
            &["idx", "key", "start", "end", "width", "strand"]
        );
        assert_eq!(
            groups[0].table.rows(),
            &[
                vec![
                    Cell::Int(1),
                    text("CDS"),
                    Cell::Int(1),
                    Cell::Int(10),
                    Cell::Int(10),
                    Cell::Strand(Strand::Reverse)
                ],
                vec![
                    Cell::Int(1),
                    text("CDS"),
                    Cell::Int(21),
                    Cell::Int(30),
                    Cell::Int(10),
                    Cell::Strand(Strand::Reverse)
                ],
            ]
        );
        assert_eq!(groups[1].table.len(), 1);
    }

    #[test]
    fn test_retrieve_single_segment_ranges_stay_flat() {
        let list = parse_features("1 CDS 5..9\n2 CDS complement(3)");
        let out = retrieve(&list, "start;strand").unwrap();
        let expected = Table::new(
            vec!["start".to_string(), "strand".to_string()],
            vec![
                vec![Cell::Int(5), Cell::Strand(Strand::Forward)],
                vec![Cell::Int(3), Cell::Strand(Strand::Reverse)],
            ],
        );
        assert_eq!(out, Retrieved::Table(expected));
    }

    #[test]
    fn test_repeated_qualifier_groups_and_pads() {
        let list = parse_features("1 misc_feature 1..5 note=a;note=b\n2 gene 6..9");
        let out = retrieve(&list, "key;note").unwrap();
        assert!(out.is_grouped());
        let table = out.into_table("x").unwrap();
        assert_eq!(
            table.rows(),
            &[
                vec![text("misc_feature"), text("a")],
                vec![text("misc_feature"), text("b")],
                vec![text("gene"), Cell::Missing],
            ]
        );
    }

    #[test]
    fn test_retrieve_conflicting_columns() {
        let list = parse_features("1 CDS 1..10");
        assert!(matches!(
            retrieve(&list, "range;width"),
            Err(ColumnError::ConflictingColumns(_))
        ));
    }
}
