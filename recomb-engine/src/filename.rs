/// GVCF filename suffixes this workspace recognizes, longest first so
/// `.g.vcf.gz` doesn't get mis-stripped as `.gvcf.gz`. Equivalent to the
/// regex `^(.+?)\.g(?:\.?vcf)(?:\.gz)?$`: every combination the regex allows
/// is enumerated explicitly rather than pulling in a regex engine for a
/// four-way suffix match.
const SUFFIXES: [&str; 4] = [".g.vcf.gz", ".gvcf.gz", ".g.vcf", ".gvcf"];

/// Returns the donor/sample name encoded in a GVCF filename, or `None` if
/// the name doesn't match any recognized suffix.
pub fn donor_name(filename: &str) -> Option<&str> {
    SUFFIXES.iter().find_map(|suffix| filename.strip_suffix(suffix)).filter(|stem| !stem.is_empty())
}
