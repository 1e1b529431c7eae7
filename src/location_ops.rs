//! Pure transformations of a [`Location`]. Each returns a new value and
//! leaves its input untouched.

use crate::location::{Location, LocationError, LocationSegment, Strand, Strands};
use crate::position::Value;

impl Location {
    /// Move every segment by `delta` bases. Fails if a coordinate would
    /// leave the `i64` range.
    pub fn shifted(&self, delta: i64) -> Result<Location, LocationError> {
        let moved = |v: i64| {
            v.checked_add(delta).ok_or_else(|| {
                LocationError::Validation(format!(
                    "shifting {} by {} overflows the coordinate range",
                    v, delta
                ))
            })
        };
        let segments = self
            .segments()
            .iter()
            .map(|s| {
                Ok(LocationSegment {
                    start: moved(s.start)?,
                    end: moved(s.end)?,
                    ..s.clone()
                })
            })
            .collect::<Result<Vec<_>, LocationError>>()?;
        Ok(self.with_segments(segments))
    }

    /// Replace the start of each segment. When every segment is a single
    /// base the ends follow, so points stay points.
    pub fn with_starts(&self, starts: &[i64]) -> Result<Location, LocationError> {
        self.replace_bound(starts, |seg, v, points| {
            seg.start = v;
            if points {
                seg.end = v;
            }
        })
    }

    /// Replace the end of each segment. Symmetric to [`Location::with_starts`].
    pub fn with_ends(&self, ends: &[i64]) -> Result<Location, LocationError> {
        self.replace_bound(ends, |seg, v, points| {
            seg.end = v;
            if points {
                seg.start = v;
            }
        })
    }

    fn replace_bound<F>(&self, values: &[i64], set: F) -> Result<Location, LocationError>
    where
        F: Fn(&mut LocationSegment, i64, bool),
    {
        if values.len() != self.len() {
            return Err(LocationError::LengthMismatch {
                expected: self.len(),
                found: values.len(),
            });
        }
        let points = self.segments().iter().all(|s| s.is_point());
        let segments = self
            .segments()
            .iter()
            .zip(values)
            .map(|(s, v)| {
                let mut s = s.clone();
                set(&mut s, *v, points);
                s
            })
            .collect();
        Ok(self.with_segments(segments))
    }

    /// Put every segment on `strand`, dropping any per-segment strands.
    pub fn with_strand(&self, strand: Strand) -> Location {
        self.with_strands(Strands::Uniform(strand))
    }
}

fn integers(values: &Value) -> Result<Vec<i64>, LocationError> {
    values.as_integers().ok_or_else(|| LocationError::Type {
        expected: "integer coordinates",
        found: format!("{} {}", values.type_name(), values),
    })
}

/// Shift by a loosely typed delta. Only the first of several values is used.
pub fn shift(location: &Location, delta: &Value) -> Result<Location, LocationError> {
    let deltas = integers(delta)?;
    match deltas.as_slice() {
        [] => Err(LocationError::LengthMismatch {
            expected: 1,
            found: 0,
        }),
        [d] => location.shifted(*d),
        [d, ..] => {
            log::warn!(
                "shift got {} values, only the first ({}) is used",
                deltas.len(),
                d
            );
            location.shifted(*d)
        }
    }
}

/// Replace segment starts; `values` needs one number per segment.
pub fn replace_start(location: &Location, values: &Value) -> Result<Location, LocationError> {
    check_len(location, values)?;
    location.with_starts(&integers(values)?)
}

/// Replace segment ends; `values` needs one number per segment.
pub fn replace_end(location: &Location, values: &Value) -> Result<Location, LocationError> {
    check_len(location, values)?;
    location.with_ends(&integers(values)?)
}

fn check_len(location: &Location, values: &Value) -> Result<(), LocationError> {
    if values.len() != location.len() {
        return Err(LocationError::LengthMismatch {
            expected: location.len(),
            found: values.len(),
        });
    }
    Ok(())
}

/// Replace the strand of every segment with one code: `"+"`/`"-"`, `1`/`-1`
/// or a missing value (`"NA"`, `0`, or an empty value).
pub fn replace_strand(location: &Location, value: &Value) -> Result<Location, LocationError> {
    if value.len() > 1 {
        return Err(LocationError::LengthMismatch {
            expected: 1,
            found: value.len(),
        });
    }
    let strand = match value {
        Value::Strings(v) => match v.first() {
            Some(s) => s.parse()?,
            None => Strand::Unknown,
        },
        Value::Ints(_) | Value::Floats(_) => match integers(value)?.first() {
            Some(code) => Strand::from_code(*code)?,
            None => Strand::Unknown,
        },
    };
    Ok(location.with_strand(strand))
}
