use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::variant::{SimpleVariant, VariantKind};

use super::header::header_text;

/// Eager, push-based GVCF writer. `write` is called synchronously per
/// record; the header is emitted lazily on first use. Idempotent on close
/// and safe to close in any order — closing twice, or never, just means the
/// buffered writer drops without a final flush, which `close` avoids.
pub struct GvcfWriter<W: Write> {
    inner: W,
    sample: String,
    header_written: bool,
}

impl GvcfWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>, sample: impl Into<String>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?), sample))
    }
}

impl<W: Write> GvcfWriter<W> {
    pub fn new(inner: W, sample: impl Into<String>) -> Self {
        Self { inner, sample: sample.into(), header_written: false }
    }

    fn ensure_header(&mut self) -> io::Result<()> {
        if !self.header_written {
            self.inner.write_all(header_text(&self.sample).as_bytes())?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Writes one record. Reference blocks always get a homozygous-reference
    /// genotype; everything else re-emits the variant's original genotype
    /// string under this writer's (possibly renamed) sample.
    pub fn write(&mut self, variant: &SimpleVariant) -> io::Result<()> {
        self.ensure_header()?;

        log::debug!(
            "{}: writing {}:{}-{} -> {}",
            self.sample,
            variant.ref_start.contig,
            variant.ref_start.at,
            variant.ref_end.at,
            variant.alt_allele
        );

        match variant.kind() {
            VariantKind::RefBlock => writeln!(
                self.inner,
                "{}\t{}\t.\t{}\t<NON_REF>\t.\t.\tEND={}\tGT\t0/0",
                variant.ref_start.contig, variant.ref_start.at, variant.ref_allele, variant.ref_end.at
            ),
            _ => {
                let genotype = if variant.genotype.is_empty() { "0/1" } else { &variant.genotype };
                writeln!(
                    self.inner,
                    "{}\t{}\t.\t{}\t{}\t.\t.\t.\tGT\t{genotype}",
                    variant.ref_start.contig, variant.ref_start.at, variant.ref_allele, variant.alt_allele
                )
            }
        }
    }

    pub fn close(mut self) -> io::Result<()> {
        self.ensure_header()?;
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use biocore::location::Position;

    use super::*;

    fn ref_block() -> SimpleVariant {
        SimpleVariant {
            ref_start: Position::new("chr1", 1),
            ref_end: Position::new("chr1", 10),
            ref_allele: "A".into(),
            alt_allele: "<NON_REF>".into(),
            genotype: String::new(),
            is_added_mutation: false,
        }
    }

    #[test]
    fn ref_block_gets_homozygous_reference_genotype() {
        let mut buf = Vec::new();
        {
            let mut w = GvcfWriter::new(&mut buf, "sampleX");
            w.write(&ref_block()).unwrap();
            w.close().unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\tGT\t0/0\n"));
        assert!(text.contains("END=10"));
        assert!(text.ends_with("sampleX\n") || text.contains("FORMAT\tsampleX\n"));
    }

    #[test]
    fn snp_reuses_its_original_genotype() {
        let mut v = ref_block();
        v.ref_allele = "A".into();
        v.alt_allele = "G".into();
        v.genotype = "1/1".into();

        let mut buf = Vec::new();
        let mut w = GvcfWriter::new(&mut buf, "sampleY");
        w.write(&v).unwrap();
        w.close().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\tGT\t1/1\n"));
    }

    #[test]
    fn header_is_written_exactly_once() {
        let mut buf = Vec::new();
        let mut w = GvcfWriter::new(&mut buf, "sampleZ");
        w.write(&ref_block()).unwrap();
        w.write(&ref_block()).unwrap();
        w.close().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("#CHROM").count(), 1);
    }
}
