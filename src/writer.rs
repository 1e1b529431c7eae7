use crate::column::Cell;
use crate::feature::FeatureList;
use crate::feature_table::write_features;
use crate::location::Location;
use crate::report::{Retrieved, Table};
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Output formats the writer knows about.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// a GenBank FEATURES block.
    #[default]
    #[value(name = "feature-table")]
    FeatureTable,
    /// tab-separated text with a header line.
    #[value(name = "tsv")]
    Tsv,
}

/// A writer for feature tables and retrieval output, to a file or stdout (`-`).
pub struct Writer {
    format: Format,
    inner: Box<dyn Write>,
}

impl Writer {
    pub fn init(path: &str, format: Format) -> io::Result<Self> {
        let inner: Box<dyn Write> = if path == "-" {
            Box::new(BufWriter::new(io::stdout().lock()))
        } else {
            Box::new(BufWriter::new(File::create(path)?))
        };
        Ok(Writer { format, inner })
    }

    /// Wrap any `Write`, e.g. a buffer in tests.
    pub fn from_write(inner: Box<dyn Write>, format: Format) -> Self {
        Writer { format, inner }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn write_features(&mut self, features: &FeatureList) -> io::Result<()> {
        match self.format {
            Format::FeatureTable => write_features(&mut self.inner, features),
            Format::Tsv => {
                writeln!(self.inner, "idx\tkey\tlocation")?;
                for f in features {
                    writeln!(self.inner, "{}\t{}\t{}", f.id, f.key, f.location)?;
                }
                Ok(())
            }
        }
    }

    /// Write retrieval output as TSV. Grouped output gets one line per row
    /// of each feature's table; a returned feature list is written in the
    /// writer's format.
    pub fn write_retrieved(&mut self, retrieved: Retrieved, name: &str) -> io::Result<()> {
        if let Retrieved::Features(features) = &retrieved {
            return self.write_features(features);
        }
        match retrieved.into_table(name) {
            Some(table) => self.write_table(&table),
            None => Ok(()),
        }
    }

    pub fn write_table(&mut self, table: &Table) -> io::Result<()> {
        writeln!(self.inner, "{}", table.names().join("\t"))?;
        for row in table {
            let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(self.inner, "{}", cells.join("\t"))?;
        }
        Ok(())
    }

    /// One canonical location per line, or with `ranges`, one
    /// `location start end width strand` line per segment.
    pub fn write_location(&mut self, location: &Location, ranges: bool) -> io::Result<()> {
        if !ranges {
            return writeln!(self.inner, "{}", location);
        }
        for r in location.ranges() {
            writeln!(
                self.inner,
                "{}\t{}\t{}\t{}\t{}",
                location, r.start, r.end, r.width, r.strand
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::retrieve;
    use crate::tests::feature_fixtures::parse_features;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A Write that keeps its bytes reachable after being boxed.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[test]
    fn test_write_grouped_as_rows() {
        let list = parse_features("1 CDS join(1..10,21..30) gene=a\n2 gene 40..50");
        let out = Shared::default();
        let mut w = Writer::from_write(Box::new(out.clone()), Format::Tsv);
        w.write_retrieved(retrieve(&list, "idx;range;gene").unwrap(), "x")
            .unwrap();
        w.flush().unwrap();
        assert_eq!(
            out.text(),
            "idx\tstart\tend\twidth\tstrand\tgene\n\
             1\t1\t10\t10\t+\ta\n\
             1\t21\t30\t10\t+\ta\n\
             2\t40\t50\t11\t+\tNA\n"
        );
    }

    #[test]
    fn test_write_sequence_uses_name() {
        let list = parse_features("1 CDS 1..10\n2 gene 40..50");
        let out = Shared::default();
        let mut w = Writer::from_write(Box::new(out.clone()), Format::Tsv);
        w.write_retrieved(retrieve(&list, "key").unwrap(), "key")
            .unwrap();
        assert_eq!(out.text(), "key\nCDS\ngene\n");
    }

    #[test]
    fn test_write_location_ranges() {
        let loc: Location = "complement(join(1..10,21..30))".parse().unwrap();
        let out = Shared::default();
        let mut w = Writer::from_write(Box::new(out.clone()), Format::Tsv);
        w.write_location(&loc, true).unwrap();
        assert_eq!(
            out.text(),
            "complement(join(1..10,21..30))\t1\t10\t10\t-\n\
             complement(join(1..10,21..30))\t21\t30\t10\t-\n"
        );
    }
}
