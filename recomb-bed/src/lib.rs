use std::{
    collections::{BTreeSet, HashMap},
    fs,
    io::{self, BufRead, BufReader},
    path::Path,
};

use recomb_core::{
    Interval, Position,
    rangemap::{RangeMap, RangeMapError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedError {
    #[error("{file}:{line}: {message}")]
    Malformed { file: String, line: usize, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("BED directory violates the disjointness invariant for donor {donor}: {source}")]
    Invariant { donor: String, source: RangeMapError },
}

/// The result of loading a directory of recombination-map BED files: each
/// donor's `RangeMap<targetName>`, plus the sorted set of every target name
/// observed across all donors.
#[derive(Debug, Default)]
pub struct RecombinationMap {
    pub donors: HashMap<String, RangeMap<String>>,
    pub targets: BTreeSet<String>,
}

/// Loads every `*.bed` file in `dir` into a [`RecombinationMap`].
///
/// The donor name is the filename with the `.bed` extension stripped, then
/// everything from (and including) the last `_` removed. Multiple files
/// contributing to the same donor append into that donor's map.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<RecombinationMap, BedError> {
    let mut map = RecombinationMap::default();

    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("bed"))
        .collect();
    entries.sort();

    for path in entries {
        let donor = donor_name(&path);
        let donor_map = map.donors.entry(donor.clone()).or_default();
        load_file(&path, donor_map, &mut map.targets).map_err(|e| match e {
            BedError::Io(io) => BedError::Io(io),
            BedError::Malformed { file, line, message } => BedError::Malformed { file, line, message },
            BedError::Invariant { source, .. } => BedError::Invariant { donor, source },
        })?;
    }

    Ok(map)
}

fn donor_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.rfind('_') {
        Some(idx) => stem[..idx].to_owned(),
        None => stem.to_owned(),
    }
}

fn load_file(path: &Path, donor_map: &mut RangeMap<String>, targets: &mut BTreeSet<String>) -> Result<(), BedError> {
    let file_label = path.display().to_string();
    let reader = BufReader::new(fs::File::open(path)?);

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() < 4 {
            // spec.md §4.5: lines with fewer than 4 columns are skipped
            // silently, not logged as malformed.
            continue;
        }

        let chrom = fields[0];
        let start0: u64 = match fields[1].parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{file_label}:{line_no}: BED start is not an integer, skipping line");
                continue;
            }
        };
        let end: u64 = match fields[2].parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{file_label}:{line_no}: BED end is not an integer, skipping line");
                continue;
            }
        };
        let target = fields[3].to_owned();

        if end < start0 + 1 {
            log::warn!("{file_label}:{line_no}: BED interval is empty or inverted, skipping line");
            continue;
        }

        let interval = Interval::new(Position::new(chrom, start0 + 1), Position::new(chrom, end));

        donor_map
            .put(interval, target.clone())
            .map_err(|source| BedError::Invariant { donor: String::new(), source })?;

        targets.insert(target);
    }

    Ok(())
}
