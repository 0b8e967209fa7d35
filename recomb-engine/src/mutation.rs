use std::{io, path::Path};

use recomb_core::{
    Interval, Position,
    gvcf::{GvcfError, GvcfReader, GvcfWriter},
    rangemap::{RangeMap, RangeMapError},
    variant::{SimpleVariant, VariantKind},
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitterError {
    #[error("variant {0} partially overlaps an existing entry; the splitter requires full containment")]
    PartialOverlap(Interval),
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Gvcf(#[from] GvcfError),
    #[error(transparent)]
    RangeMap(#[from] RangeMapError),
    #[error(transparent)]
    Splitter(#[from] SplitterError),
}

/// Reads a baseline GVCF into a range map keyed by each record's own
/// `[refStart, refEnd]`.
pub fn load_baseline(path: impl AsRef<Path>) -> Result<RangeMap<SimpleVariant>, MutationError> {
    let mut map = RangeMap::new();
    for record in GvcfReader::open(path)? {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };
        let variant = record.to_variant();
        map.put(variant.interval(), variant)?;
    }
    Ok(map)
}

/// Merges `new_variant` into `baseline`. Returns `Ok(true)` if it was
/// applied, `Ok(false)` if it was silently skipped (a ref block, or an
/// overlap with an existing indel), and `Err` if applying it would violate
/// the splitter's containment precondition.
pub fn add_variant(baseline: &mut RangeMap<SimpleVariant>, mut new_variant: SimpleVariant) -> Result<bool, MutationError> {
    new_variant.is_added_mutation = true;

    if new_variant.kind() == VariantKind::RefBlock {
        log::warn!("skipping added ref-block variant at {}: ref blocks never overlay an existing map", new_variant.ref_start);
        return Ok(false);
    }

    let overlapped = baseline.overlapping(&new_variant.interval());

    if overlapped.iter().any(|(_, v)| v.kind() == VariantKind::Indel) {
        log::warn!("skipping added variant at {}: overlaps an existing indel", new_variant.ref_start);
        return Ok(false);
    }

    if let [(iv, existing)] = overlapped.as_slice() {
        if *iv == new_variant.interval() && existing.kind() == VariantKind::Snp {
            let iv = iv.clone();
            baseline.remove(&iv);
            baseline.put(new_variant.interval(), new_variant)?;
            return Ok(true);
        }
    }

    for (iv, existing) in &overlapped {
        if existing.kind() != VariantKind::RefBlock || !iv.contains_interval(&new_variant.interval()) {
            return Err(SplitterError::PartialOverlap(new_variant.interval()).into());
        }
    }

    let pieces: Vec<(Interval, SimpleVariant)> = overlapped.into_iter().map(|(iv, v)| (iv, v.clone())).collect();
    for (iv, existing) in pieces {
        baseline.remove(&iv);

        if iv.lo < new_variant.ref_start {
            let left_hi = prev_position(&new_variant.ref_start);
            let mut left = existing.clone();
            left.ref_end = left_hi.clone();
            baseline.put(Interval::new(iv.lo.clone(), left_hi), left)?;
        }
        if new_variant.ref_end < iv.hi {
            let right_lo = next_position(&new_variant.ref_end);
            let mut right = existing;
            right.ref_start = right_lo.clone();
            baseline.put(Interval::new(right_lo, iv.hi.clone()), right)?;
        }
    }

    baseline.put(new_variant.interval(), new_variant)?;
    Ok(true)
}

pub fn write_mutated(baseline: &RangeMap<SimpleVariant>, sample: &str, out_path: impl AsRef<Path>) -> Result<(), MutationError> {
    let mut writer = GvcfWriter::create(out_path, sample)?;
    for (_, variant) in baseline.iter() {
        writer.write(variant)?;
    }
    writer.close()?;
    Ok(())
}

fn prev_position(p: &Position) -> Position {
    Position::new(p.contig.clone(), p.at - 1)
}

fn next_position(p: &Position) -> Position {
    Position::new(p.contig.clone(), p.at + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ref_block(contig: &str, lo: u64, hi: u64) -> SimpleVariant {
        SimpleVariant {
            ref_start: Position::new(contig, lo),
            ref_end: Position::new(contig, hi),
            ref_allele: "A".into(),
            alt_allele: "<NON_REF>".into(),
            genotype: "0/0".into(),
            is_added_mutation: false,
        }
    }

    fn indel(contig: &str, lo: u64, hi: u64) -> SimpleVariant {
        SimpleVariant {
            ref_start: Position::new(contig, lo),
            ref_end: Position::new(contig, hi),
            ref_allele: "GGGGG".into(),
            alt_allele: "G".into(),
            genotype: "0/1".into(),
            is_added_mutation: false,
        }
    }

    fn snp(contig: &str, at: u64, alt: &str) -> SimpleVariant {
        SimpleVariant {
            ref_start: Position::new(contig, at),
            ref_end: Position::new(contig, at),
            ref_allele: "G".into(),
            alt_allele: alt.into(),
            genotype: "0/1".into(),
            is_added_mutation: false,
        }
    }

    #[test]
    fn snp_inside_existing_indel_is_skipped() {
        let mut baseline = RangeMap::new();
        baseline.put(indel("chr1", 201, 205).interval(), indel("chr1", 201, 205)).unwrap();

        let applied = add_variant(&mut baseline, snp("chr1", 202, "A")).unwrap();
        assert!(!applied);
        assert_eq!(baseline.len(), 1);
    }

    #[test]
    fn snp_outside_indel_splits_surrounding_ref_block() {
        let mut baseline = RangeMap::new();
        baseline.put(indel("chr1", 201, 205).interval(), indel("chr1", 201, 205)).unwrap();
        baseline.put(Interval::new(Position::new("chr1", 206), Position::new("chr1", 600)), ref_block("chr1", 206, 600)).unwrap();

        let applied = add_variant(&mut baseline, snp("chr1", 500, "A")).unwrap();
        assert!(applied);

        let (left, _) = baseline.get_entry(&Position::new("chr1", 206)).unwrap();
        assert_eq!(left, Interval::new(Position::new("chr1", 206), Position::new("chr1", 499)));
        let (right, _) = baseline.get_entry(&Position::new("chr1", 501)).unwrap();
        assert_eq!(right, Interval::new(Position::new("chr1", 501), Position::new("chr1", 600)));
        let (mid, v) = baseline.get_entry(&Position::new("chr1", 500)).unwrap();
        assert_eq!(mid, Interval::new(Position::new("chr1", 500), Position::new("chr1", 500)));
        assert!(v.is_added_mutation);
    }

    #[test]
    fn same_position_snp_is_replaced_outright() {
        let mut baseline = RangeMap::new();
        baseline.put(snp("chr1", 50, "A").interval(), snp("chr1", 50, "A")).unwrap();

        add_variant(&mut baseline, snp("chr1", 50, "T")).unwrap();
        let (_, v) = baseline.get_entry(&Position::new("chr1", 50)).unwrap();
        assert_eq!(v.alt_allele, "T");
    }

    #[test]
    fn ref_block_variant_is_never_added() {
        let mut baseline = RangeMap::new();
        let applied = add_variant(&mut baseline, ref_block("chr1", 1, 10)).unwrap();
        assert!(!applied);
        assert!(baseline.is_empty());
    }
}
