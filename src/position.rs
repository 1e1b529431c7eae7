use crate::location::{Location, LocationSegment};
use std::fmt;

/// A Value is a vector of integers, floats, or strings.
/// Often this will be a single value. It is the loosely typed argument
/// accepted by the location operations, e.g. a shift read from a command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Strings(Vec<String>),
}

impl Value {
    pub fn len(&self) -> usize {
        match self {
            Value::Ints(v) => v.len(),
            Value::Floats(v) => v.len(),
            Value::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the element type, used in type errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Ints(_) => "integer",
            Value::Floats(_) => "float",
            Value::Strings(_) => "string",
        }
    }

    /// The values as integers. Floats must be integral; strings are never numeric.
    pub fn as_integers(&self) -> Option<Vec<i64>> {
        match self {
            Value::Ints(v) => Some(v.clone()),
            Value::Floats(v) => v
                .iter()
                .map(|f| {
                    if f.is_finite() && *f == f.trunc() {
                        Some(*f as i64)
                    } else {
                        None
                    }
                })
                .collect(),
            Value::Strings(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let items: Vec<String> = match self {
            Value::Ints(v) => v.iter().map(|i| i.to_string()).collect(),
            Value::Floats(v) => v.iter().map(|x| x.to_string()).collect(),
            Value::Strings(v) => v.iter().map(|s| format!("{:?}", s)).collect(),
        };
        write!(f, "[{}]", items.join(", "))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Ints(vec![i])
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Ints(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Strings(vec![s.to_string()])
    }
}

/// A Positioned has a closed, 1-based extent on its sequence.
/// Multi-segment things report their joined span.
pub trait Positioned {
    /// first base covered.
    fn start(&self) -> i64;

    /// last base covered (inclusive).
    fn stop(&self) -> i64;

    /// (start, stop) as a pair.
    #[inline]
    fn extent(&self) -> (i64, i64) {
        (self.start(), self.stop())
    }
}

impl Positioned for LocationSegment {
    #[inline]
    fn start(&self) -> i64 {
        self.start
    }
    #[inline]
    fn stop(&self) -> i64 {
        self.end
    }
}

impl Positioned for Location {
    #[inline]
    fn start(&self) -> i64 {
        self.span().0
    }
    #[inline]
    fn stop(&self) -> i64 {
        self.span().1
    }
}

impl Positioned for (i64, i64) {
    #[inline]
    fn start(&self) -> i64 {
        self.0
    }
    #[inline]
    fn stop(&self) -> i64 {
        self.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_integers() {
        assert_eq!(Value::Ints(vec![3, 4]).as_integers(), Some(vec![3, 4]));
        assert_eq!(Value::Floats(vec![3.0]).as_integers(), Some(vec![3]));
        assert_eq!(Value::Floats(vec![3.5]).as_integers(), None);
        assert_eq!(Value::from("3").as_integers(), None);
    }

    #[test]
    fn test_location_extent() {
        let loc: Location = "join(100..200,10..20)".parse().unwrap();
        assert_eq!(loc.extent(), (10, 200));
        assert_eq!(loc.segments()[0].extent(), (100, 200));
    }
}
