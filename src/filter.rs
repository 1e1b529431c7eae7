//! Tokenizer for filter specs such as `"key=CDS;loc=100:2000;gene=tnpR,tnpA"`.
//!
//! Clauses are separated by `;` and recognized by prefix:
//! `idx=`/`index=`, `loc=`/`location=`, `key=`, and anything else is a
//! qualifier clause, `tag` or `tag=value`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// a clause that cannot be read, e.g. a non-numeric index.
    InvalidClause(String),
    /// a key, tag or value pattern that is not a valid regular expression.
    InvalidPattern(String),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FilterError::InvalidClause(s) => write!(f, "invalid filter clause: {}", s),
            FilterError::InvalidPattern(s) => write!(f, "invalid filter pattern: {}", s),
        }
    }
}

impl std::error::Error for FilterError {}

/// Inclusive range of feature ids; a single id has `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub from: u64,
    pub to: u64,
}

impl IdRange {
    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.from <= id && id <= self.to
    }
}

/// A coordinate query. A missing bound is filled in from the feature list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterClause {
    Index(Vec<IdRange>),
    Location(Vec<RangeQuery>),
    /// alternatives for the feature key.
    Key(Vec<String>),
    /// alternatives for the tag and, optionally, for the value.
    Qualifier {
        tag: Vec<String>,
        values: Option<Vec<String>>,
    },
}

fn items(payload: &str) -> impl Iterator<Item = &str> {
    payload.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_id(s: &str, clause: &str) -> Result<u64, FilterError> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| FilterError::InvalidClause(format!("{:?} is not a feature index in {:?}", s, clause)))
}

fn parse_coordinate(s: &str, clause: &str) -> Result<Option<i64>, FilterError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<i64>().map(Some).map_err(|_| {
        FilterError::InvalidClause(format!("{:?} is not a coordinate in {:?}", s, clause))
    })
}

fn parse_index(payload: &str, clause: &str) -> Result<FilterClause, FilterError> {
    let mut ranges = Vec::new();
    for item in items(payload) {
        let range = match item.split_once(':') {
            Some((a, b)) => {
                let (a, b) = (parse_id(a, clause)?, parse_id(b, clause)?);
                IdRange {
                    from: a.min(b),
                    to: a.max(b),
                }
            }
            None => {
                let id = parse_id(item, clause)?;
                IdRange { from: id, to: id }
            }
        };
        ranges.push(range);
    }
    if ranges.is_empty() {
        return Err(FilterError::InvalidClause(format!("no indices in {:?}", clause)));
    }
    Ok(FilterClause::Index(ranges))
}

fn parse_ranges(payload: &str, clause: &str) -> Result<FilterClause, FilterError> {
    let mut queries = Vec::new();
    for item in items(payload) {
        let query = match item.split_once(':') {
            Some((a, b)) => RangeQuery {
                start: parse_coordinate(a, clause)?,
                end: parse_coordinate(b, clause)?,
            },
            None => {
                let pos = parse_coordinate(item, clause)?;
                RangeQuery {
                    start: pos,
                    end: pos,
                }
            }
        };
        queries.push(query);
    }
    if queries.is_empty() {
        return Err(FilterError::InvalidClause(format!("no ranges in {:?}", clause)));
    }
    Ok(FilterClause::Location(queries))
}

fn alternatives(payload: &str, clause: &str) -> Result<Vec<String>, FilterError> {
    let alts: Vec<String> = items(payload).map(String::from).collect();
    if alts.is_empty() {
        return Err(FilterError::InvalidClause(format!("empty pattern in {:?}", clause)));
    }
    Ok(alts)
}

fn parse_clause(clause: &str) -> Result<FilterClause, FilterError> {
    let (head, payload) = match clause.split_once('=') {
        Some((h, p)) => (h.trim(), Some(p.trim())),
        None => (clause.trim(), None),
    };
    match (head, payload) {
        ("idx" | "index", Some(p)) => parse_index(p, clause),
        ("loc" | "location", Some(p)) => parse_ranges(p, clause),
        ("key", Some(p)) => Ok(FilterClause::Key(alternatives(p, clause)?)),
        ("idx" | "index" | "loc" | "location" | "key", None) => Err(FilterError::InvalidClause(
            format!("{:?} needs a value", clause),
        )),
        (tag, values) => Ok(FilterClause::Qualifier {
            tag: alternatives(tag, clause)?,
            values: values.map(|v| alternatives(v, clause)).transpose()?,
        }),
    }
}

/// Split a filter spec into clauses. Newlines and tabs count as spaces and
/// empty clauses are ignored.
pub fn parse_filter(spec: &str) -> Result<Vec<FilterClause>, FilterError> {
    let spec = spec.replace(['\n', '\t', '\r'], " ");
    spec.split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(parse_clause)
        .collect()
}
