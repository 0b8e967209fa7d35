use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use recomb_bed::RecombinationMap;
use recomb_core::{
    Interval, Position,
    gvcf::GvcfReader,
    rangemap::{RangeMap, RangeMapError},
    variant::VariantKind,
};
use thiserror::Error;

use crate::filename::donor_name;

#[derive(Debug, Error)]
pub enum ResizerError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Invariant(#[from] RangeMapError),
}

struct StraddlingIndel {
    donor: String,
    left_target: String,
    ref_start: Position,
    ref_end: Position,
}

enum Op {
    Remove(String, Interval),
    Insert(String, Interval, String),
}

/// Scans every donor's GVCF for indels that straddle a boundary of that
/// donor's recombination map, then rewrites the flipped (target-keyed) maps
/// so each straddling indel lands in exactly one target. Returns the
/// resized `donor -> RangeMap<target>` maps (Phase D, already flipped back).
///
/// Phase A is order-insensitive and empty input is a documented no-op
/// (`spec.md` §4.6, §8 S6).
pub fn resize(bed: &RecombinationMap, gvcf_dir: impl AsRef<Path>) -> Result<HashMap<String, RangeMap<String>>, ResizerError> {
    let gvcf_dir = gvcf_dir.as_ref();

    let mut donors: Vec<&String> = bed.donors.keys().collect();
    donors.sort();

    let mut straddling = Vec::new();
    for donor in donors {
        let own_map = &bed.donors[donor];
        let Some(path) = find_gvcf_file(gvcf_dir, donor)? else {
            log::warn!("no GVCF file found for donor {donor} under {}, skipping Phase A scan", gvcf_dir.display());
            continue;
        };

        for record in GvcfReader::open(&path)? {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("{e}");
                    continue;
                }
            };
            let variant = record.to_variant();
            if variant.kind() != VariantKind::Indel {
                continue;
            }

            let start_entry = own_map.get_entry(&variant.ref_start);
            let end_entry = own_map.get_entry(&variant.ref_end);
            if let (Some((iv_start, left_target)), Some((iv_end, _))) = (start_entry, end_entry) {
                if iv_start != iv_end {
                    straddling.push(StraddlingIndel {
                        donor: donor.clone(),
                        left_target: left_target.clone(),
                        ref_start: variant.ref_start,
                        ref_end: variant.ref_end,
                    });
                }
            }
        }
    }

    if straddling.is_empty() {
        return Ok(bed.donors.clone());
    }

    log::info!("resizing recombination map for {} straddling indel(s)", straddling.len());

    let flipped = flip(&bed.donors);

    let mut resolved: Vec<(Interval, StraddlingIndel, Vec<Op>)> = Vec::new();
    for indel in straddling {
        if let Some((i0, ops)) = resolve_indel(&bed.donors, &flipped, &indel) {
            resolved.push((i0, indel, ops));
        }
    }

    let mut groups: HashMap<(String, Position), Vec<(StraddlingIndel, Vec<Op>)>> = HashMap::new();
    for (i0, indel, ops) in resolved {
        groups.entry((indel.left_target.clone(), i0.lo)).or_default().push((indel, ops));
    }

    let mut winning_ops = Vec::new();
    for (_, mut group) in groups {
        group.sort_by_key(|(indel, _)| tie_break_key(indel));
        let (_, ops) = group.into_iter().next().expect("group is never empty");
        winning_ops.extend(ops);
    }

    let mut flipped = flipped;
    for op in &winning_ops {
        if let Op::Remove(target, iv) = op {
            if let Some(map) = flipped.get_mut(target) {
                map.remove(iv);
            }
        }
    }
    for op in winning_ops {
        if let Op::Insert(target, iv, donor) = op {
            flipped.entry(target).or_default().put(iv, donor)?;
        }
    }

    Ok(flip(&flipped))
}

/// Resolves one straddling indel against the pre-resize state, returning the
/// original entry it extends (`I0`, used for tie-break grouping) and the
/// full batch of removals/insertions it requires.
///
/// Returns `None` if `I0` itself can't be found (Phase A's own invariant
/// failing to hold, never hit in practice) or if `indel.ref_end` turns out
/// to lie beyond every interval the recombination map assigns past `I0` —
/// §7's degenerate case, logged and skipped rather than committing a bogus
/// extension.
fn resolve_indel(
    donor_maps: &HashMap<String, RangeMap<String>>,
    flipped: &HashMap<String, RangeMap<String>>,
    indel: &StraddlingIndel,
) -> Option<(Interval, Vec<Op>)> {
    let target_map = flipped.get(&indel.left_target)?;
    let (i0, _) = target_map.get_entry(&indel.ref_start)?;

    if i0.hi >= indel.ref_end {
        // Another indel already extended this boundary past ours.
        return Some((i0, Vec::new()));
    }

    let mut ops = vec![
        Op::Remove(indel.left_target.clone(), i0.clone()),
        Op::Insert(indel.left_target.clone(), Interval::new(i0.lo.clone(), indel.ref_end.clone()), indel.donor.clone()),
    ];

    // Tracks whether something — either side of the walk below — actually
    // reaches as far as `ref_end`. If neither does, the indel runs off the
    // edge of everything the map currently knows about and must be skipped.
    let mut covered_to_ref_end = false;

    // Walk rightward through `target`'s OWN flipped map (which may hold
    // entries contributed by other donors adjacent to I0) and fold anything
    // up to `ref_end` into the extended slice.
    for (iv, other_donor) in target_map.iter() {
        if iv.lo <= i0.lo {
            continue;
        }
        if iv.lo.contig != indel.ref_end.contig || iv.lo > indel.ref_end {
            break;
        }
        if iv.hi <= indel.ref_end {
            ops.push(Op::Remove(indel.left_target.clone(), iv.clone()));
            if iv.hi == indel.ref_end {
                covered_to_ref_end = true;
            }
            continue;
        }
        ops.push(Op::Remove(indel.left_target.clone(), iv.clone()));
        let new_lo = Position::new(indel.ref_end.contig.clone(), indel.ref_end.at + 1);
        ops.push(Op::Insert(indel.left_target.clone(), Interval::new(new_lo, iv.hi), other_donor.clone()));
        covered_to_ref_end = true;
        break;
    }

    // Phase C step 4: shrink the donor's own other overlapped entries so its
    // map stays disjoint after Phase D (the newly-extended slice now owns
    // positions that entry used to own). This is also where the indel's
    // right edge usually turns out to be covered when step 3 above found
    // nothing — the donor's own map, unlike one target's flipped slice,
    // always has an entry for `ref_end` per Phase A's straddling check.
    if let Some(own_map) = donor_maps.get(&indel.donor) {
        let indel_interval = Interval::new(indel.ref_start.clone(), indel.ref_end.clone());
        for (other_iv, other_target) in own_map.overlapping(&indel_interval) {
            if other_iv == i0 {
                continue;
            }
            ops.push(Op::Remove(other_target.clone(), other_iv.clone()));
            if other_iv.hi > indel.ref_end {
                let new_lo = Position::new(indel.ref_end.contig.clone(), indel.ref_end.at + 1);
                ops.push(Op::Insert(other_target.clone(), Interval::new(new_lo, other_iv.hi), indel.donor.clone()));
            }
            if other_iv.hi >= indel.ref_end {
                covered_to_ref_end = true;
            }
        }
    }

    if !covered_to_ref_end {
        log::warn!(
            "indel {}:{}-{} in donor {} extends beyond the end of every interval the recombination map assigns past {}; the map cannot legally contain it, skipping",
            indel.ref_start.contig,
            indel.ref_start.at,
            indel.ref_end.at,
            indel.donor,
            indel.left_target
        );
        return None;
    }

    Some((i0, ops))
}

fn tie_break_key(indel: &StraddlingIndel) -> (std::cmp::Reverse<u64>, String, Position) {
    let length = indel.ref_end.at - indel.ref_start.at + 1;
    (std::cmp::Reverse(length), indel.donor.clone(), indel.ref_start.clone())
}

/// Inverts a `name -> RangeMap<otherName>` mapping. An involution under the
/// precondition that each input map is internally disjoint.
pub(crate) fn flip(maps: &HashMap<String, RangeMap<String>>) -> HashMap<String, RangeMap<String>> {
    let mut flipped: HashMap<String, RangeMap<String>> = HashMap::new();
    for (key, map) in maps {
        for (interval, value) in map.iter() {
            flipped
                .entry(value.clone())
                .or_default()
                .put(interval, key.clone())
                .expect("donor maps are disjoint by construction; flipping cannot overlap");
        }
    }
    flipped
}

fn find_gvcf_file(dir: &Path, donor: &str) -> io::Result<Option<PathBuf>> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if donor_name(name) == Some(donor) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
