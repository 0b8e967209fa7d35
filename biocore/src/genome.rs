use std::{collections::BTreeMap, io};

/// An in-memory reference genome: contig name to its raw sequence bytes.
///
/// Case is preserved from the source FASTA. Treated as immutable once loaded;
/// loaders only ever construct a fresh instance, never mutate an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceGenome {
    contigs: BTreeMap<String, Vec<u8>>,
}
impl ReferenceGenome {
    pub fn new(contigs: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            contigs: contigs.into_iter().collect(),
        }
    }

    /// The reference base at the 1-based position `at` on `contig`.
    pub fn base_at(&self, contig: &str, at: u64) -> io::Result<u8> {
        let sequence = self.contigs.get(contig).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("reference FASTA has no contig named {contig:?}"),
            )
        })?;

        let index = usize::try_from(at - 1).map_err(io::Error::other)?;
        sequence.get(index).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("position {contig}:{at} is past the end of its contig ({} bases)", sequence.len()),
            )
        })
    }

    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }

    pub fn contig_len(&self, contig: &str) -> Option<usize> {
        self.contigs.get(contig).map(Vec::len)
    }
}
