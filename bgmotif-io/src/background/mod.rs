//! Reader and writer for background tables in plain text.
//!
//! Each line stores a k-mer followed by its value, which is either a
//! marginal frequency or a conditional probability depending on the model.
//! The k-mer may be preceded by a row index, which is ignored. Blank lines
//! and comments starting with `#` are skipped:
//! ```text
//! # order-1 background
//! A   0.3
//! C   0.2
//! G   0.2
//! T   0.3
//! 4   AA  0.35
//! ```

use std::io::BufRead;
use std::io::Write;

use bgmotif::bg::BackgroundRow;
use bgmotif::bg::FrequencyBackgroundModel;
use bgmotif::bg::MarkovBackgroundModel;
use bgmotif::bg::Metadata;
use log::debug;

use crate::error::Error;

mod parse;

/// An iterative reader for background tables.
///
/// Yields the `(kmer, value)` pairs of the table in file order.
pub struct Reader<B: BufRead> {
    bufread: B,
    line: String,
    lineno: usize,
}

impl<B: BufRead> Reader<B> {
    /// Create a new `Reader` from a buffered reader.
    pub fn new(reader: B) -> Self {
        Self {
            bufread: reader,
            line: String::new(),
            lineno: 0,
        }
    }
}

impl<B: BufRead> Iterator for Reader<B> {
    type Item = Result<(String, f64), Error>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.bufread.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => self.lineno += 1,
                Err(e) => return Some(Err(Error::from(e))),
            }
            let text = match memchr::memchr(b'#', self.line.as_bytes()) {
                Some(i) => &self.line[..i],
                None => self.line.as_str(),
            };
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            return match self::parse::entry(text) {
                Ok((_, (_, kmer, value))) => Some(Ok((kmer.to_string(), value))),
                Err(_) => Some(Err(Error::InvalidData(Some(format!(
                    "line {}: {:?}",
                    self.lineno, text
                ))))),
            };
        }
    }
}

/// Read the entries of a background table.
pub fn read<B: BufRead>(reader: B) -> self::Reader<B> {
    self::Reader::new(reader)
}

/// Read a background table of marginal frequencies.
pub fn read_frequency<B: BufRead>(
    reader: B,
    metadata: Metadata,
) -> Result<FrequencyBackgroundModel, Error> {
    let pairs = read(reader).collect::<Result<Vec<_>, _>>()?;
    debug!("read {} entries for {:?}", pairs.len(), metadata.name());
    Ok(FrequencyBackgroundModel::from_pairs(metadata, &pairs)?)
}

/// Read a background table of conditional probabilities.
pub fn read_markov<B: BufRead>(
    reader: B,
    metadata: Metadata,
) -> Result<MarkovBackgroundModel, Error> {
    let pairs = read(reader).collect::<Result<Vec<_>, _>>()?;
    debug!("read {} entries for {:?}", pairs.len(), metadata.name());
    Ok(MarkovBackgroundModel::from_pairs(metadata, &pairs)?)
}

/// Write the rows of a background model as a table.
///
/// Rows are written in the given order, which for rows obtained from a
/// model is by increasing length then lexicographic order.
pub fn write<W: Write>(mut writer: W, rows: &[BackgroundRow]) -> Result<(), Error> {
    for row in rows {
        writeln!(writer, "{}\t{}", row.kmer, row.probability)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_reader_skips_comments() {
        let text = concat!(
            "# header\n",
            "\n",
            "A 0.4  # most frequent\n",
            "1\tC\t0.1\n",
        );
        let pairs = read(Cursor::new(text))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            pairs,
            vec![(String::from("A"), 0.4), (String::from("C"), 0.1)]
        );
    }

    #[test]
    fn test_reader_invalid_line() {
        let mut reader = read(Cursor::new("A 0.4\nC\n"));
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(Error::InvalidData(Some(msg))) => assert!(msg.starts_with("line 2")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
