use std::io::{self, BufRead};

use crate::genome::ReferenceGenome;

/// Loads a reference FASTA into memory.
///
/// Follows the streaming-definition/streaming-sequence shape of a forward-only
/// FASTA reader: each `>name ...` line starts a new contig, and every
/// following line (up to the next `>` or EOF) is appended to its sequence.
pub fn load(reader: impl BufRead) -> io::Result<ReferenceGenome> {
    let mut contigs = Vec::new();

    let mut current_name: Option<String> = None;
    let mut current_sequence: Vec<u8> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if let Some(name) = line.strip_prefix('>') {
            if let Some(name) = current_name.take() {
                contigs.push((name, std::mem::take(&mut current_sequence)));
            }
            // The definition line may carry a description after whitespace;
            // only the first token is the contig name.
            current_name = Some(name.split_whitespace().next().unwrap_or("").to_owned());
        } else {
            current_sequence.extend(line.trim_end().as_bytes());
        }
    }
    if let Some(name) = current_name {
        contigs.push((name, current_sequence));
    }

    Ok(ReferenceGenome::new(contigs))
}

pub fn load_file(path: impl AsRef<std::path::Path>) -> io::Result<ReferenceGenome> {
    let file = std::fs::File::open(path)?;
    load(io::BufReader::new(file))
}
