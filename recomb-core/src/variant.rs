use biocore::location::{Interval, Position};

/// A single GVCF record reduced to the fields the core actually acts on.
///
/// `genotype` is carried verbatim from the source record's sample column so
/// the writer can re-emit it under a renamed sample; the donor/target sample
/// name itself is threaded separately by whichever component is doing the
/// renaming, not stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleVariant {
    pub ref_start: Position,
    pub ref_end: Position,
    pub ref_allele: String,
    pub alt_allele: String,
    pub genotype: String,
    pub is_added_mutation: bool,
}

impl SimpleVariant {
    pub fn interval(&self) -> Interval {
        Interval::new(self.ref_start.clone(), self.ref_end.clone())
    }

    pub fn kind(&self) -> VariantKind {
        classify(&self.ref_allele, &self.alt_allele)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Snp,
    RefBlock,
    Indel,
    Complex,
}

/// Pure classification of `(refAllele, altAllele)`, the only inputs the rule
/// depends on (`refEnd >= refStart` always holds — `Interval` enforces it).
pub fn classify(ref_allele: &str, alt_allele: &str) -> VariantKind {
    let is_non_ref = alt_allele == "<NON_REF>";
    let ref_len = ref_allele.len();
    let alt_len = alt_allele.len();

    if ref_len == 1 && alt_len == 1 && !is_non_ref {
        VariantKind::Snp
    } else if ref_len == 1 && is_non_ref {
        VariantKind::RefBlock
    } else if ref_len != alt_len && !is_non_ref {
        VariantKind::Indel
    } else {
        VariantKind::Complex
    }
}
