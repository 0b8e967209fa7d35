use std::{
    fs::{self, File},
    io::Write as _,
};

use biocore::fasta;
use recomb_bed::load_dir;
use recomb_engine::{resizer::resize, writer::write_recombined};

fn write_bed(dir: &std::path::Path, donor: &str, rows: &[(&str, u64, u64, &str)]) {
    let mut f = File::create(dir.join(format!("{donor}.bed"))).unwrap();
    for (chrom, start0, end, target) in rows {
        writeln!(f, "{chrom}\t{start0}\t{end}\t{target}").unwrap();
    }
}

fn write_gvcf(dir: &std::path::Path, donor: &str, lines: &[&str]) {
    let mut f = File::create(dir.join(format!("{donor}.gvcf"))).unwrap();
    writeln!(f, "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{donor}").unwrap();
    for line in lines {
        writeln!(f, "{line}").unwrap();
    }
}

fn write_fasta(path: &std::path::Path, contig: &str, bases: &str) {
    let mut f = File::create(path).unwrap();
    writeln!(f, ">{contig}").unwrap();
    writeln!(f, "{bases}").unwrap();
}

/// Three donors, each split across the same three targets; GVCFs carry
/// nothing but a single reference block spanning the whole donor.
#[test]
fn basic_three_way_recombination() {
    let bed_dir = tempfile::tempdir().unwrap();
    let gvcf_dir = tempfile::tempdir().unwrap();
    let out_gvcf = tempfile::tempdir().unwrap();
    let out_bed = tempfile::tempdir().unwrap();
    let fasta_path = bed_dir.path().join("ref.fa");
    write_fasta(&fasta_path, "chr1", &"A".repeat(30));

    for donor in ["sampleA", "sampleB", "sampleC"] {
        write_bed(bed_dir.path(), donor, &[("chr1", 0, 10, "sampleX"), ("chr1", 10, 20, "sampleY"), ("chr1", 20, 30, "sampleZ")]);
        write_gvcf(gvcf_dir.path(), donor, &["chr1\t1\t.\tA\t<NON_REF>\t.\t.\tEND=30\tGT\t0/0"]);
    }

    let bed = load_dir(bed_dir.path()).unwrap();
    let resized = resize(&bed, gvcf_dir.path()).unwrap();
    let reference = fasta::load_file(&fasta_path).unwrap();
    write_recombined(&resized, gvcf_dir.path(), &reference, out_gvcf.path(), out_bed.path()).unwrap();

    for target in ["sampleX", "sampleY", "sampleZ"] {
        let path = out_gvcf.path().join(format!("{target}_recombined.gvcf"));
        let contents = fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing {target}"));
        // Three donors each contribute a ref-block piece to every target.
        assert_eq!(contents.lines().filter(|l| !l.starts_with('#')).count(), 3);
        assert!(contents.contains("<NON_REF>"));
    }
}

/// `sampleC`'s indel straddles its own `10 -> 11` boundary; after resize the
/// whole indel lands in a single target (`sampleZ`) instead of being split.
#[test]
fn straddling_indel_lands_entirely_in_one_target() {
    let bed_dir = tempfile::tempdir().unwrap();
    let gvcf_dir = tempfile::tempdir().unwrap();
    let out_gvcf = tempfile::tempdir().unwrap();
    let out_bed = tempfile::tempdir().unwrap();
    let fasta_path = bed_dir.path().join("ref.fa");
    write_fasta(&fasta_path, "chr1", &"A".repeat(30));

    write_bed(bed_dir.path(), "sampleC", &[("chr1", 0, 10, "sampleZ"), ("chr1", 10, 30, "sampleB")]);
    write_gvcf(gvcf_dir.path(), "sampleC", &["chr1\t9\t.\tAAA\tA\t.\t.\t.\tGT\t0/1"]);

    let bed = load_dir(bed_dir.path()).unwrap();
    let resized = resize(&bed, gvcf_dir.path()).unwrap();
    let reference = fasta::load_file(&fasta_path).unwrap();
    write_recombined(&resized, gvcf_dir.path(), &reference, out_gvcf.path(), out_bed.path()).unwrap();

    let z = fs::read_to_string(out_gvcf.path().join("sampleZ_recombined.gvcf")).unwrap();
    assert!(z.contains("chr1\t9\t.\tAAA\tA"));
    assert!(!fs::read_to_string(out_gvcf.path().join("sampleB_recombined.gvcf")).unwrap().contains("AAA"));
}

/// A single donor ref block spans three target intervals; each output GVCF
/// gets the clipped piece that falls in its range.
#[test]
fn ref_block_splits_at_both_boundaries() {
    let bed_dir = tempfile::tempdir().unwrap();
    let gvcf_dir = tempfile::tempdir().unwrap();
    let out_gvcf = tempfile::tempdir().unwrap();
    let out_bed = tempfile::tempdir().unwrap();
    let fasta_path = bed_dir.path().join("ref.fa");
    write_fasta(&fasta_path, "chr1", &"A".repeat(30));

    write_bed(bed_dir.path(), "sampleC", &[("chr1", 0, 10, "sampleX"), ("chr1", 10, 20, "sampleY"), ("chr1", 20, 30, "sampleZ")]);
    write_gvcf(gvcf_dir.path(), "sampleC", &["chr1\t5\t.\tA\t<NON_REF>\t.\t.\tEND=25\tGT\t0/0"]);

    let bed = load_dir(bed_dir.path()).unwrap();
    let resized = resize(&bed, gvcf_dir.path()).unwrap();
    let reference = fasta::load_file(&fasta_path).unwrap();
    write_recombined(&resized, gvcf_dir.path(), &reference, out_gvcf.path(), out_bed.path()).unwrap();

    let x = fs::read_to_string(out_gvcf.path().join("sampleX_recombined.gvcf")).unwrap();
    let y = fs::read_to_string(out_gvcf.path().join("sampleY_recombined.gvcf")).unwrap();
    let z = fs::read_to_string(out_gvcf.path().join("sampleZ_recombined.gvcf")).unwrap();
    assert!(x.contains("chr1\t5\t.\tA\t<NON_REF>\t.\t.\tEND=10"));
    assert!(y.contains("chr1\t11\t.\tA\t<NON_REF>\t.\t.\tEND=20"));
    assert!(z.contains("chr1\t21\t.\tA\t<NON_REF>\t.\t.\tEND=25"));
}

/// An empty BED directory is a documented no-op all the way through: empty
/// maps, a no-op resize, and a writer that produces no output files.
#[test]
fn empty_bed_directory_is_a_no_op() {
    let bed_dir = tempfile::tempdir().unwrap();
    let gvcf_dir = tempfile::tempdir().unwrap();
    let out_gvcf = tempfile::tempdir().unwrap();
    let out_bed = tempfile::tempdir().unwrap();
    let fasta_path = bed_dir.path().join("ref.fa");
    write_fasta(&fasta_path, "chr1", "A");

    let bed = load_dir(bed_dir.path()).unwrap();
    assert!(bed.donors.is_empty());

    let resized = resize(&bed, gvcf_dir.path()).unwrap();
    assert!(resized.is_empty());

    let reference = fasta::load_file(&fasta_path).unwrap();
    write_recombined(&resized, gvcf_dir.path(), &reference, out_gvcf.path(), out_bed.path()).unwrap();

    assert_eq!(fs::read_dir(out_gvcf.path()).unwrap().count(), 0);
    assert_eq!(fs::read_dir(out_bed.path()).unwrap().count(), 0);
}
