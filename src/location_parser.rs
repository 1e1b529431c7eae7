//! Parser for the GenBank feature location notation.
//!
//! ```text
//! SIMPLE     := INT | INT "^" INT | ["<"] INT "." [">"] INT | ["<"] INT ".." [">"] INT
//! SIMPLE_LOC := [ACCESSION ":"] SIMPLE
//! PCSL       := SIMPLE_LOC | "complement(" SIMPLE_LOC ")"
//! COMPOUND   := ("join"|"order") "(" PCSL ("," PCSL)* ")"
//! TOP        := PCSL | "complement(" COMPOUND ")" | COMPOUND
//! ```
//!
//! Deeper nesting (a join inside a join, a complement around a complement)
//! is not part of the grammar and is rejected.

use crate::location::{Compound, Location, LocationError, LocationSegment, Strand, Strands};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

static SIMPLE_LOC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?P<acc>[A-Za-z][A-Za-z0-9_]*(?:\.[A-Za-z0-9]+)?):)?",
        r"(?:(?P<point>\d+)",
        r"|(?P<left>\d+)\^(?P<right>\d+)",
        r"|(?P<p5><)?(?P<start>\d+)(?P<op>\.\.?)(?P<p3>>)?(?P<end>\d+))$",
    ))
    .expect("static location regex")
});

static COMPOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(join|order)\((.+)\)$").expect("static compound regex"));

fn strip_complement(s: &str) -> Option<&str> {
    s.strip_prefix("complement(")?.strip_suffix(')')
}

fn coordinate(digits: &str, text: &str) -> Result<i64, LocationError> {
    digits.parse::<i64>().map_err(|_| {
        LocationError::Grammar(format!("{} (coordinate {} out of range)", text, digits))
    })
}

/// Match one `SIMPLE_LOC`. `Ok(None)` means the text is not of that form.
fn parse_simple_loc(s: &str, text: &str) -> Result<Option<LocationSegment>, LocationError> {
    let caps = match SIMPLE_LOC.captures(s) {
        Some(c) => c,
        None => return Ok(None),
    };
    let mut segment = if let Some(p) = caps.name("point") {
        LocationSegment::point(coordinate(p.as_str(), text)?)
    } else if let (Some(l), Some(r)) = (caps.name("left"), caps.name("right")) {
        LocationSegment {
            start: coordinate(l.as_str(), text)?,
            end: coordinate(r.as_str(), text)?,
            closed: false,
            partial5: false,
            partial3: false,
            accession: None,
        }
    } else {
        // the third alternative always captures start, op and end
        let start = coordinate(&caps["start"], text)?;
        let end = coordinate(&caps["end"], text)?;
        LocationSegment {
            start,
            end,
            closed: &caps["op"] == "..",
            partial5: caps.name("p5").is_some(),
            partial3: caps.name("p3").is_some(),
            accession: None,
        }
    };
    if let Some(acc) = caps.name("acc") {
        segment.accession = Some(acc.as_str().to_string());
    }
    Ok(Some(segment))
}

/// Match one `PCSL`, returning the segment and its strand.
fn parse_pcsl(s: &str, text: &str) -> Result<Option<(LocationSegment, Strand)>, LocationError> {
    match strip_complement(s) {
        Some(inner) => Ok(parse_simple_loc(inner, text)?.map(|seg| (seg, Strand::Reverse))),
        None => Ok(parse_simple_loc(s, text)?.map(|seg| (seg, Strand::Forward))),
    }
}

/// Parse a GenBank location string.
///
/// Whitespace is ignored, so locations wrapped over several lines of a flat
/// file parse as written.
pub fn parse_location(text: &str) -> Result<Location, LocationError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if let Some((segment, strand)) = parse_pcsl(&compact, text)? {
        return Ok(Location::simple(segment, strand));
    }

    let (outer_complement, body) = match strip_complement(&compact) {
        Some(inner) => (true, inner),
        None => (false, compact.as_str()),
    };
    let caps = COMPOUND
        .captures(body)
        .ok_or_else(|| LocationError::Grammar(text.to_string()))?;
    let compound: Compound = caps[1].parse()?;

    let mut segments = Vec::new();
    let mut strands = Vec::new();
    for item in caps[2].split(',') {
        let (segment, strand) =
            parse_pcsl(item, text)?.ok_or_else(|| LocationError::Grammar(text.to_string()))?;
        segments.push(segment);
        strands.push(strand);
    }

    let uniform = strands.iter().all(|s| *s == strands[0]);
    let strand = match (outer_complement, uniform) {
        (true, true) => Strands::Uniform(Strand::Reverse),
        (true, false) => {
            log::warn!(
                "{}: complement() around segments with mixed strands, keeping per-segment strands",
                text
            );
            Strands::PerSegment(strands)
        }
        (false, true) => Strands::Uniform(strands[0]),
        (false, false) => Strands::PerSegment(strands),
    };
    // join(x) with a single element is just x
    let compound = if segments.len() > 1 {
        Some(compound)
    } else {
        None
    };
    Location::new(segments, strand, compound)
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s)
    }
}
