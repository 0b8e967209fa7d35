use std::{
    fs::File,
    io::{self, BufRead, BufReader, Lines},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;
use thiserror::Error;

use biocore::location::{Interval, Position};

use crate::variant::SimpleVariant;

#[derive(Debug, Error)]
pub enum GvcfError {
    #[error("{file}:{line}: {message}")]
    Malformed { file: String, line: usize, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A single GVCF data record, reduced to the fields the core reads: contig,
/// 1-based start/end, the reference allele, the first alt allele only, and
/// the sample's genotype string and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GvcfRecord {
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub sample_name: String,
    pub genotype: String,
}

impl GvcfRecord {
    pub fn interval(&self) -> Interval {
        Interval::new(Position::new(self.contig.clone(), self.start), Position::new(self.contig.clone(), self.end))
    }

    pub fn to_variant(&self) -> SimpleVariant {
        SimpleVariant {
            ref_start: Position::new(self.contig.clone(), self.start),
            ref_end: Position::new(self.contig.clone(), self.end),
            ref_allele: self.ref_allele.clone(),
            alt_allele: self.alt_allele.clone(),
            genotype: self.genotype.clone(),
            is_added_mutation: false,
        }
    }
}

/// Forward-only, non-restartable GVCF reader. Produces `SimpleVariant`-ready
/// records in file order; never seeks or reorders.
pub struct GvcfReader {
    lines: Lines<Box<dyn BufRead>>,
    pending: Option<String>,
    file: String,
    line_no: usize,
    sample_name: String,
}

impl GvcfReader {
    /// Opens `path`, transparently decompressing a `.gz` suffix via
    /// `flate2`'s `MultiGzDecoder`.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        let reader: Box<dyn BufRead> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(file)
        };
        Self::from_reader(reader, path.display().to_string())
    }

    pub fn from_reader(reader: Box<dyn BufRead>, file_label: String) -> io::Result<Self> {
        let mut lines = reader.lines();
        let mut sample_name = String::new();
        let mut line_no = 0usize;
        let mut pending = None;

        while let Some(line) = lines.next() {
            let line = line?;
            line_no += 1;
            if let Some(rest) = line.strip_prefix("#CHROM") {
                sample_name = rest.split('\t').next_back().unwrap_or("").trim().to_owned();
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            pending = Some(line);
            break;
        }

        Ok(Self { lines, pending, file: file_label, line_no, sample_name })
    }

    fn malformed(&self, message: impl Into<String>) -> GvcfError {
        GvcfError::Malformed { file: self.file.clone(), line: self.line_no, message: message.into() }
    }

    fn parse_line(&self, line: &str) -> Result<GvcfRecord, GvcfError> {
        let mut fields = line.split('\t');

        let contig = fields.next().ok_or_else(|| self.malformed("missing CHROM"))?.to_owned();
        let pos: u64 = fields
            .next()
            .ok_or_else(|| self.malformed("missing POS"))?
            .parse()
            .map_err(|_| self.malformed("POS is not an integer"))?;
        let _id = fields.next().ok_or_else(|| self.malformed("missing ID"))?;
        let ref_allele = fields.next().ok_or_else(|| self.malformed("missing REF"))?.to_owned();
        let alt_field = fields.next().ok_or_else(|| self.malformed("missing ALT"))?;
        let alt_allele = alt_field.split(',').next().unwrap_or(alt_field).to_owned();
        let _qual = fields.next().ok_or_else(|| self.malformed("missing QUAL"))?;
        let _filter = fields.next().ok_or_else(|| self.malformed("missing FILTER"))?;
        let info = fields.next().ok_or_else(|| self.malformed("missing INFO"))?;
        let _format = fields.next();
        let genotype = fields.next().unwrap_or("").split(':').next().unwrap_or("").to_owned();

        let end = match info.split(';').find_map(|kv| kv.strip_prefix("END=")) {
            Some(v) => v.parse::<u64>().map_err(|_| self.malformed("invalid END="))?,
            None => pos + ref_allele.len() as u64 - 1,
        };

        if end < pos {
            return Err(self.malformed(format!("END {end} precedes POS {pos}")));
        }

        Ok(GvcfRecord { contig, start: pos, end, ref_allele, alt_allele, sample_name: self.sample_name.clone(), genotype })
    }
}

impl Iterator for GvcfReader {
    type Item = Result<GvcfRecord, GvcfError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.pending.take() {
            Some(line) => line,
            None => {
                self.line_no += 1;
                match self.lines.next()? {
                    Ok(line) => line,
                    Err(e) => return Some(Err(GvcfError::Io(e))),
                }
            }
        };

        if line.trim().is_empty() {
            return self.next();
        }

        Some(self.parse_line(&line))
    }
}
