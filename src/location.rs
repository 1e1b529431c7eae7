use std::fmt;
use std::str::FromStr;

/// Error returned by location parsing, construction and the location operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// the text matches no production of the location grammar.
    Grammar(String),
    /// an invalid strand or compound code, or a broken structural invariant.
    Validation(String),
    /// a per-segment argument whose length differs from the segment count.
    LengthMismatch { expected: usize, found: usize },
    /// an argument of the wrong type, e.g. text where a coordinate is needed.
    Type {
        expected: &'static str,
        found: String,
    },
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LocationError::Grammar(s) => {
                write!(f, "location {:?} does not match the location grammar", s)
            }
            LocationError::Validation(s) => write!(f, "invalid location: {}", s),
            LocationError::LengthMismatch { expected, found } => write!(
                f,
                "length mismatch: expected {} value(s), one per segment, got {}",
                expected, found
            ),
            LocationError::Type { expected, found } => {
                write!(f, "type error: expected {}, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for LocationError {}

/// Strand of a segment. `Unknown` is the missing (NA) strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unknown,
}

impl Strand {
    /// The numeric code: `Some(1)`, `Some(-1)` or `None` for an unknown strand.
    pub fn code(self) -> Option<i8> {
        match self {
            Strand::Forward => Some(1),
            Strand::Reverse => Some(-1),
            Strand::Unknown => None,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, LocationError> {
        match code {
            1 => Ok(Strand::Forward),
            -1 => Ok(Strand::Reverse),
            0 => Ok(Strand::Unknown),
            _ => Err(LocationError::Validation(format!(
                "strand code must be 1, -1 or 0, got {}",
                code
            ))),
        }
    }

    pub fn is_reverse(self) -> bool {
        self == Strand::Reverse
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
            Strand::Unknown => write!(f, "NA"),
        }
    }
}

impl FromStr for Strand {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "+1" | "1" => Ok(Strand::Forward),
            "-" | "-1" => Ok(Strand::Reverse),
            "" | "." | "NA" | "na" | "0" => Ok(Strand::Unknown),
            other => Err(LocationError::Validation(format!(
                "unknown strand code {:?}",
                other
            ))),
        }
    }
}

/// Compound operator grouping the segments of a multi-segment location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compound {
    Join,
    Order,
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Compound::Join => write!(f, "join"),
            Compound::Order => write!(f, "order"),
        }
    }
}

impl FromStr for Compound {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "join" => Ok(Compound::Join),
            "order" => Ok(Compound::Order),
            other => Err(LocationError::Validation(format!(
                "unknown compound operator {:?}",
                other
            ))),
        }
    }
}

/// Strand of a whole location: one value for every segment, or one per segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Strands {
    Uniform(Strand),
    PerSegment(Vec<Strand>),
}

impl Strands {
    /// Collapse a per-segment vector that holds a single distinct value.
    fn normalized(self) -> Self {
        match self {
            Strands::PerSegment(v) if !v.is_empty() && v.iter().all(|s| *s == v[0]) => {
                Strands::Uniform(v[0])
            }
            other => other,
        }
    }
}

/// One contiguous span of a location.
///
/// `closed` is true for an ordinary `start..end` range. An open segment with
/// `end == start + 1` is a between-bases site (`^`), any other open segment is
/// a within range (`.`). `start == end` is a single base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationSegment {
    pub start: i64,
    pub end: i64,
    pub closed: bool,
    pub partial5: bool,
    pub partial3: bool,
    pub accession: Option<String>,
}

impl LocationSegment {
    pub fn range(start: i64, end: i64) -> Self {
        LocationSegment {
            start,
            end,
            closed: true,
            partial5: false,
            partial3: false,
            accession: None,
        }
    }

    pub fn point(position: i64) -> Self {
        Self::range(position, position)
    }

    /// The site between `start` and `start + 1`.
    pub fn between(start: i64) -> Self {
        LocationSegment {
            end: start + 1,
            closed: false,
            ..Self::range(start, start)
        }
    }

    /// A single base somewhere within `start.end`.
    pub fn within(start: i64, end: i64) -> Self {
        LocationSegment {
            closed: false,
            ..Self::range(start, end)
        }
    }

    pub fn with_partial(mut self, partial5: bool, partial3: bool) -> Self {
        self.partial5 = partial5;
        self.partial3 = partial3;
        self
    }

    pub fn on_accession(mut self, accession: impl Into<String>) -> Self {
        self.accession = Some(accession.into());
        self
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn is_between(&self) -> bool {
        !self.closed && self.end == self.start + 1
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.accession.is_some()
    }

    #[inline]
    pub fn width(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// Renders the segment without any strand wrapping.
impl fmt::Display for LocationSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(acc) = &self.accession {
            write!(f, "{}:", acc)?;
        }
        if self.is_point() {
            return write!(f, "{}", self.start);
        }
        let sep = if self.closed {
            ".."
        } else if self.is_between() {
            "^"
        } else {
            "."
        };
        write!(
            f,
            "{}{}{}{}{}",
            if self.partial5 { "<" } else { "" },
            self.start,
            sep,
            if self.partial3 { ">" } else { "" },
            self.end
        )
    }
}

/// One row of the per-segment range table of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRange {
    pub start: i64,
    pub end: i64,
    pub width: i64,
    pub strand: Strand,
}

/// A feature location: ordered segments with strand and compound metadata.
///
/// Values are immutable; every operation returns a new `Location`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    segments: Vec<LocationSegment>,
    strand: Strands,
    compound: Option<Compound>,
}

impl Location {
    /// Build a location, checking that there is at least one segment, that a
    /// single segment has no compound operator and that a per-segment strand
    /// vector has one entry per segment.
    pub fn new(
        segments: Vec<LocationSegment>,
        strand: Strands,
        compound: Option<Compound>,
    ) -> Result<Self, LocationError> {
        if segments.is_empty() {
            return Err(LocationError::Validation(
                "a location needs at least one segment".to_string(),
            ));
        }
        if segments.len() == 1 && compound.is_some() {
            return Err(LocationError::Validation(
                "a single-segment location cannot be a join or order".to_string(),
            ));
        }
        if let Strands::PerSegment(v) = &strand {
            if v.len() != segments.len() {
                return Err(LocationError::LengthMismatch {
                    expected: segments.len(),
                    found: v.len(),
                });
            }
        }
        Ok(Location {
            segments,
            strand: strand.normalized(),
            compound,
        })
    }

    /// A single-segment location.
    pub fn simple(segment: LocationSegment, strand: Strand) -> Self {
        Location {
            segments: vec![segment],
            strand: Strands::Uniform(strand),
            compound: None,
        }
    }

    /// Swap in new segments of the same count, keeping strand and compound.
    pub(crate) fn with_segments(&self, segments: Vec<LocationSegment>) -> Self {
        debug_assert_eq!(segments.len(), self.segments.len());
        Location {
            segments,
            strand: self.strand.clone(),
            compound: self.compound,
        }
    }

    pub(crate) fn with_strands(&self, strand: Strands) -> Self {
        Location {
            segments: self.segments.clone(),
            strand: strand.normalized(),
            compound: self.compound,
        }
    }

    #[inline]
    pub fn segments(&self) -> &[LocationSegment] {
        &self.segments
    }

    #[inline]
    pub fn strand(&self) -> &Strands {
        &self.strand
    }

    #[inline]
    pub fn compound(&self) -> Option<Compound> {
        self.compound
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: a location holds at least one segment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Strand of the `i`th segment.
    pub fn strand_of(&self, i: usize) -> Strand {
        match &self.strand {
            Strands::Uniform(s) => *s,
            Strands::PerSegment(v) => v.get(i).copied().unwrap_or_default(),
        }
    }

    pub fn strands(&self) -> Vec<Strand> {
        (0..self.segments.len()).map(|i| self.strand_of(i)).collect()
    }

    pub fn starts(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.start).collect()
    }

    pub fn ends(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.end).collect()
    }

    pub fn widths(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.width()).collect()
    }

    /// Per-segment `start`, `end`, `width` and `strand`.
    pub fn ranges(&self) -> Vec<SegmentRange> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| SegmentRange {
                start: s.start,
                end: s.end,
                width: s.width(),
                strand: self.strand_of(i),
            })
            .collect()
    }

    /// The joined span: smallest start and largest end over all segments.
    pub fn span(&self) -> (i64, i64) {
        let lo = self.segments.iter().map(|s| s.start).min().unwrap_or(0);
        let hi = self.segments.iter().map(|s| s.end).max().unwrap_or(0);
        (lo, hi)
    }

    pub fn is_remote(&self) -> bool {
        self.segments.iter().any(|s| s.is_remote())
    }
}

/// Canonical GenBank rendering of the location.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let body = match &self.strand {
            Strands::Uniform(_) => self
                .segments
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(","),
            Strands::PerSegment(strands) => self
                .segments
                .iter()
                .zip(strands)
                .map(|(s, strand)| {
                    if strand.is_reverse() {
                        format!("complement({})", s)
                    } else {
                        s.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
        };
        let body = match self.compound {
            Some(c) => format!("{}({})", c, body),
            None => body,
        };
        match self.strand {
            Strands::Uniform(Strand::Reverse) => write!(f, "complement({})", body),
            _ => write!(f, "{}", body),
        }
    }
}

/// Render a location in its canonical string form.
pub fn render_location(location: &Location) -> String {
    location.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_segment_forms() {
        assert_eq!(LocationSegment::point(340).to_string(), "340");
        assert_eq!(LocationSegment::range(340, 565).to_string(), "340..565");
        assert_eq!(LocationSegment::between(123).to_string(), "123^124");
        assert_eq!(LocationSegment::within(102, 110).to_string(), "102.110");
        assert_eq!(
            LocationSegment::range(340, 565)
                .with_partial(true, true)
                .to_string(),
            "<340..>565"
        );
        assert_eq!(
            LocationSegment::range(1, 20)
                .on_accession("J00194.1")
                .to_string(),
            "J00194.1:1..20"
        );
    }

    #[test]
    fn test_point_ignores_partial_markers() {
        let seg = LocationSegment::point(7).with_partial(true, true);
        assert_eq!(seg.to_string(), "7");
    }

    #[test]
    fn test_render_uniform_reverse_join() {
        let loc = Location::new(
            vec![
                LocationSegment::range(345, 543),
                LocationSegment::range(2691, 4571),
            ],
            Strands::Uniform(Strand::Reverse),
            Some(Compound::Join),
        )
        .unwrap();
        assert_eq!(loc.to_string(), "complement(join(345..543,2691..4571))");
    }

    #[test]
    fn test_render_mixed_strands_wraps_each_segment() {
        let loc = Location::new(
            vec![LocationSegment::range(1, 10), LocationSegment::range(20, 30)],
            Strands::PerSegment(vec![Strand::Forward, Strand::Reverse]),
            Some(Compound::Order),
        )
        .unwrap();
        assert_eq!(loc.to_string(), "order(1..10,complement(20..30))");
    }

    #[test]
    fn test_new_rejects_broken_invariants() {
        assert!(matches!(
            Location::new(vec![], Strands::Uniform(Strand::Forward), None),
            Err(LocationError::Validation(_))
        ));
        assert!(matches!(
            Location::new(
                vec![LocationSegment::range(1, 2)],
                Strands::Uniform(Strand::Forward),
                Some(Compound::Join)
            ),
            Err(LocationError::Validation(_))
        ));
        assert_eq!(
            Location::new(
                vec![LocationSegment::range(1, 2), LocationSegment::range(4, 5)],
                Strands::PerSegment(vec![Strand::Forward]),
                Some(Compound::Join)
            ),
            Err(LocationError::LengthMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_uniform_strand_vector_collapses() {
        let loc = Location::new(
            vec![LocationSegment::range(1, 2), LocationSegment::range(4, 5)],
            Strands::PerSegment(vec![Strand::Reverse, Strand::Reverse]),
            Some(Compound::Join),
        )
        .unwrap();
        assert_eq!(loc.strand(), &Strands::Uniform(Strand::Reverse));
    }

    #[test]
    fn test_span_and_widths() {
        let loc = Location::new(
            vec![LocationSegment::range(50, 60), LocationSegment::range(10, 20)],
            Strands::Uniform(Strand::Forward),
            Some(Compound::Order),
        )
        .unwrap();
        assert_eq!(loc.span(), (10, 60));
        assert_eq!(loc.widths(), vec![11, 11]);
        assert_eq!(loc.starts(), vec![50, 10]);
    }

    #[test]
    fn test_strand_codes() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
        assert_eq!("-1".parse::<Strand>().unwrap(), Strand::Reverse);
        assert_eq!("NA".parse::<Strand>().unwrap(), Strand::Unknown);
        assert!("x".parse::<Strand>().is_err());
        assert_eq!(Strand::from_code(-1).unwrap(), Strand::Reverse);
        assert!(Strand::from_code(2).is_err());
        assert_eq!(Strand::Reverse.code(), Some(-1));
        assert!("bond".parse::<Compound>().is_err());
    }
}
