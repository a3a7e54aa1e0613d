//! Reader and writer for weight matrices in plain text.
//!
//! Each record starts with a FASTA-like header storing the matrix name and
//! version, followed by one line per nucleotide in `A, C, G, T` order with
//! the whitespace-separated weights at each position:
//! ```text
//! >MA0004 1
//! 0.2  0.95 0.0 0.0 0.0 0.0
//! 0.8  0.0  1.0 0.0 0.0 0.0
//! 0.0  0.05 0.0 1.0 0.0 1.0
//! 0.0  0.0  0.0 0.0 1.0 0.0
//! ```
//! Blank lines between records are ignored.

use std::io::BufRead;
use std::io::Write;

use bgmotif::abc::Alphabet;
use bgmotif::abc::Dna;
use bgmotif::pwm::MatrixMetadata;
use bgmotif::pwm::WeightMatrix;

use crate::error::Error;

mod parse;

/// An iterative reader for weight matrices.
pub struct Reader<B: BufRead> {
    bufread: B,
    line: String,
    buffer: String,
}

impl<B: BufRead> Reader<B> {
    /// Create a new `Reader` from a buffered reader.
    pub fn new(reader: B) -> Self {
        Self {
            bufread: reader,
            line: String::new(),
            buffer: String::new(),
        }
    }

    /// Fill the buffer with the next header and its 4 weight lines.
    ///
    /// Returns the number of non-blank lines read.
    fn fill(&mut self) -> Result<usize, Error> {
        self.buffer.clear();
        let mut n = 0;
        while n < 5 {
            self.line.clear();
            if self.bufread.read_line(&mut self.line)? == 0 {
                break;
            }
            if self.line.trim().is_empty() {
                continue;
            }
            self.buffer.push_str(&self.line);
            if !self.line.ends_with('\n') {
                self.buffer.push('\n');
            }
            n += 1;
        }
        Ok(n)
    }
}

impl<B: BufRead> Iterator for Reader<B> {
    type Item = Result<WeightMatrix, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.fill() {
            Ok(0) => return None,
            Ok(_) => (),
            Err(e) => return Some(Err(e)),
        }
        let ((name, version), rows) = match self::parse::record(&self.buffer) {
            Ok((_, record)) => record,
            Err(e) => return Some(Err(Error::from(e))),
        };
        let metadata = MatrixMetadata::new(name, version);
        let matrix = self::parse::build_columns(rows)
            .map_err(Error::from)
            .and_then(|columns| Ok(WeightMatrix::from_columns(metadata, columns)?));
        Some(matrix)
    }
}

/// Read the matrices from a file.
pub fn read<B: BufRead>(reader: B) -> self::Reader<B> {
    self::Reader::new(reader)
}

/// Write a matrix as a header followed by one line per nucleotide.
pub fn write<W: Write>(mut writer: W, matrix: &WeightMatrix) -> Result<(), Error> {
    if matrix.version().is_empty() {
        writeln!(writer, ">{}", matrix.name())?;
    } else {
        writeln!(writer, ">{} {}", matrix.name(), matrix.version())?;
    }
    for &symbol in Dna::symbols() {
        let line = (0..matrix.len())
            .map(|i| matrix.get(i, symbol).to_string())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    #[test]
    fn test_single() {
        let text = concat!(
            ">MA0004 1\n",
            "0.2 0.95 0.0\n",
            "0.8 0.0  1.0\n",
            "0.0 0.05 0.0\n",
            "0.0 0.0  0.0\n",
        );
        let mut reader = super::Reader::new(Cursor::new(text));
        let matrix = reader.next().unwrap().unwrap();
        assert_eq!(matrix.name(), "MA0004");
        assert_eq!(matrix.version(), "1");
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.column(1), [0.95, 0.0, 0.05, 0.0]);
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_trailing_newline() {
        let text = ">m 2\n1 0\n0 1\n0 0\n0 0";
        let matrix = super::read(Cursor::new(text)).next().unwrap().unwrap();
        assert_eq!(matrix.len(), 2);
    }

    #[test]
    fn test_truncated() {
        let text = ">m 2\n1 0\n0 1\n";
        assert!(super::read(Cursor::new(text)).next().unwrap().is_err());
    }
}
