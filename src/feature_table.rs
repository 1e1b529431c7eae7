//! Reading and writing the FEATURES block of a GenBank flat file.
//!
//! ```text
//! FEATURES             Location/Qualifiers
//!      CDS             join(12..78,
//!                      134..202)
//!                      /gene="tnpR"
//!                      /codon_start=1
//! ```
//!
//! Feature keys start in column 6, locations and qualifiers in column 22.
//! Everything before a `FEATURES` header and from the first following line
//! that starts in column 1 (`ORIGIN`, `//`, ...) is ignored.
//!
//! A flag qualifier (`/pseudo`) and an empty quoted value (`/note=""`) are
//! both read as an empty value, and an empty value is written as a flag.

use crate::feature::{FeatureList, Qualifiers};
use crate::location::Location;
use crate::location_parser::parse_location;
use std::io::{self, BufRead, Read, Write};

const KEY_COLUMN: usize = 5;
const VALUE_COLUMN: usize = 21;

/// Qualifiers whose wrapped lines are joined without a space.
const UNSPACED: &[&str] = &["translation"];

struct PendingFeature {
    key: String,
    location: String,
    line: usize,
    qualifiers: Qualifiers,
    /// raw text of the qualifier being read: tag and value so far.
    open: Option<(String, String)>,
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// A quoted value is complete once its quotes balance.
fn is_complete(raw: &str) -> bool {
    !raw.starts_with('"') || (raw.len() > 1 && raw.matches('"').count() % 2 == 0)
}

fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => raw.to_string(),
    }
}

impl PendingFeature {
    fn close_qualifier(&mut self) {
        if let Some((tag, raw)) = self.open.take() {
            self.qualifiers.push(tag, unquote(&raw));
        }
    }

    fn add_qualifier(&mut self, text: &str) {
        self.close_qualifier();
        let text = &text[1..];
        let (tag, raw) = match text.split_once('=') {
            Some((t, v)) => (t.to_string(), v.to_string()),
            None => (text.to_string(), String::new()),
        };
        self.open = Some((tag, raw));
        if self.open.as_ref().is_some_and(|(_, raw)| is_complete(raw)) {
            self.close_qualifier();
        }
    }

    fn continue_qualifier(&mut self, text: &str) {
        let complete = match &mut self.open {
            Some((tag, raw)) => {
                if !UNSPACED.contains(&tag.as_str()) {
                    raw.push(' ');
                }
                raw.push_str(text);
                is_complete(raw)
            }
            None => false,
        };
        if complete {
            self.close_qualifier();
        }
    }

    fn finish(self) -> io::Result<(String, Location, Qualifiers)> {
        if let Some((tag, _)) = &self.open {
            return Err(invalid(format!(
                "line {}: unterminated value for qualifier /{}",
                self.line, tag
            )));
        }
        let location = parse_location(&self.location)
            .map_err(|e| invalid(format!("line {}: {}", self.line, e)))?;
        Ok((self.key, location, self.qualifiers))
    }
}

/// Read a feature table, numbering features from 1 in file order.
pub fn read_features<R>(reader: R) -> io::Result<FeatureList>
where
    R: Read,
{
    let reader = io::BufReader::new(reader);
    let lines: Vec<String> = reader.lines().collect::<io::Result<_>>()?;

    let begin = lines
        .iter()
        .position(|l| l.starts_with("FEATURES"))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut items = Vec::new();
    let mut current: Option<PendingFeature> = None;
    for (i, line) in lines.iter().enumerate().skip(begin) {
        let lineno = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        if indent == 0 {
            break;
        }
        let text = line.trim();
        if indent < VALUE_COLUMN - 1 {
            if let Some(done) = current.take() {
                items.push(done.finish()?);
            }
            if indent != KEY_COLUMN {
                log::warn!("line {}: feature key not in column {}", lineno, KEY_COLUMN + 1);
            }
            let (key, location) = text
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid(format!("line {}: feature {:?} has no location", lineno, text)))?;
            current = Some(PendingFeature {
                key: key.to_string(),
                location: location.trim().to_string(),
                line: lineno,
                qualifiers: Qualifiers::new(),
                open: None,
            });
            continue;
        }
        let feature = current
            .as_mut()
            .ok_or_else(|| invalid(format!("line {}: continuation line before any feature", lineno)))?;
        if feature.open.is_some() {
            feature.continue_qualifier(text);
        } else if text.starts_with('/') {
            feature.add_qualifier(text);
        } else if feature.qualifiers.is_empty() {
            feature.location.push_str(text);
        } else {
            return Err(invalid(format!(
                "line {}: unexpected text after qualifiers: {}",
                lineno, text
            )));
        }
    }
    if let Some(done) = current.take() {
        items.push(done.finish()?);
    }
    log::debug!("read {} features", items.len());
    Ok(FeatureList::numbered(items))
}

fn format_value(value: &str) -> String {
    if value.parse::<i64>().is_ok() {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

/// Write features as a FEATURES block with canonical locations.
pub fn write_features<W: Write>(out: &mut W, features: &FeatureList) -> io::Result<()> {
    writeln!(out, "{:<width$}Location/Qualifiers", "FEATURES", width = VALUE_COLUMN)?;
    for f in features {
        // keys of 16 or more characters still need a separating space
        let width = (VALUE_COLUMN - KEY_COLUMN).max(f.key.len() + 1);
        writeln!(
            out,
            "{:indent$}{:<width$}{}",
            "",
            f.key,
            f.location,
            indent = KEY_COLUMN,
            width = width
        )?;
        for (tag, value) in f.qualifiers.iter() {
            if value.is_empty() {
                writeln!(out, "{:indent$}/{}", "", tag, indent = VALUE_COLUMN)?;
            } else {
                writeln!(
                    out,
                    "{:indent$}/{}={}",
                    "",
                    tag,
                    format_value(value),
                    indent = VALUE_COLUMN
                )?;
            }
        }
    }
    Ok(())
}
