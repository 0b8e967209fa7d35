use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use biocore::genome::ReferenceGenome;
use recomb_core::{
    gvcf::{GvcfReader, GvcfWriter},
    rangemap::RangeMap,
    variant::{SimpleVariant, VariantKind},
};
use thiserror::Error;

use crate::{filename::donor_name, resizer::flip};

#[derive(Debug, Error)]
pub enum WriterError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Streams every donor GVCF in `gvcf_dir` through its (already resized)
/// range map, writing recombined per-target GVCFs into `out_gvcf_dir` and
/// the resized BED audit files into `out_bed_dir`.
pub fn write_recombined(
    resized: &HashMap<String, RangeMap<String>>,
    gvcf_dir: impl AsRef<Path>,
    reference: &ReferenceGenome,
    out_gvcf_dir: impl AsRef<Path>,
    out_bed_dir: impl AsRef<Path>,
) -> Result<(), WriterError> {
    let gvcf_dir = gvcf_dir.as_ref();
    let out_gvcf_dir = out_gvcf_dir.as_ref();
    let out_bed_dir = out_bed_dir.as_ref();
    fs::create_dir_all(out_gvcf_dir)?;
    fs::create_dir_all(out_bed_dir)?;

    let mut donor_files: Vec<(String, PathBuf)> = fs::read_dir(gvcf_dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let path = e.path();
            let name = path.file_name()?.to_str()?.to_owned();
            donor_name(&name).map(|d| (d.to_owned(), path))
        })
        .collect();
    donor_files.sort();

    let mut writers: HashMap<String, GvcfWriter<BufWriter<File>>> = HashMap::new();

    for (donor, path) in donor_files {
        let Some(ranges) = resized.get(&donor) else {
            log::warn!("donor {donor} has a GVCF file but no recombination map entry, skipping");
            continue;
        };

        log::info!("streaming donor {donor} from {}", path.display());

        for record in GvcfReader::open(&path)? {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("{e}");
                    continue;
                }
            };
            let variant = record.to_variant();

            match variant.kind() {
                VariantKind::RefBlock => {
                    for (clipped, target) in ranges.sub_range(&variant.interval()) {
                        let base = reference.base_at(&clipped.lo.contig, clipped.lo.at)?;
                        let piece = SimpleVariant {
                            ref_start: clipped.lo,
                            ref_end: clipped.hi,
                            ref_allele: (base as char).to_string(),
                            alt_allele: "<NON_REF>".to_owned(),
                            genotype: "0/0".to_owned(),
                            is_added_mutation: false,
                        };
                        writer_for(&mut writers, out_gvcf_dir, target)?.write(&piece)?;
                    }
                }
                _ => {
                    let Some(target) = ranges.get(&variant.ref_start) else {
                        log::debug!("no target covers {}:{}, skipping record", variant.ref_start.contig, variant.ref_start.at);
                        continue;
                    };
                    log::debug!("{}:{} -> {target}", variant.ref_start.contig, variant.ref_start.at);
                    writer_for(&mut writers, out_gvcf_dir, target)?.write(&variant)?;
                }
            }
        }
    }

    for (_, writer) in writers {
        writer.close()?;
    }

    write_resized_bed(resized, out_bed_dir)?;

    Ok(())
}

fn writer_for<'a>(
    writers: &'a mut HashMap<String, GvcfWriter<BufWriter<File>>>,
    out_dir: &Path,
    target: &str,
) -> io::Result<&'a mut GvcfWriter<BufWriter<File>>> {
    if !writers.contains_key(target) {
        let path = out_dir.join(format!("{target}_recombined.gvcf"));
        writers.insert(target.to_owned(), GvcfWriter::create(path, target)?);
    }
    Ok(writers.get_mut(target).expect("just inserted"))
}

fn write_resized_bed(resized: &HashMap<String, RangeMap<String>>, out_dir: &Path) -> io::Result<()> {
    let flipped = flip(resized);
    let mut targets: Vec<&String> = flipped.keys().collect();
    targets.sort();

    for target in targets {
        let map = &flipped[target];
        let path = out_dir.join(format!("{target}_resized.bed"));
        let mut f = BufWriter::new(File::create(path)?);
        for (interval, donor) in map.iter() {
            writeln!(f, "{}\t{}\t{}\t{}", interval.lo.contig, interval.lo.at - 1, interval.hi.at, donor)?;
        }
    }
    Ok(())
}
