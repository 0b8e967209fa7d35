/// The fixed generic GVCF header this workspace emits. Covers at minimum the
/// FORMAT/INFO fields `spec.md` §4.4 requires; no per-input header carry-over
/// is attempted (schema evolution of VCF headers is a stated non-goal).
pub fn header_text(sample: &str) -> String {
    format!(
        "##fileformat=VCFv4.2\n\
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
##FORMAT=<ID=AD,Number=R,Type=Integer,Description=\"Allelic depths\">\n\
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">\n\
##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype quality\">\n\
##FORMAT=<ID=PL,Number=G,Type=Integer,Description=\"Phred-scaled genotype likelihoods\">\n\
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total depth\">\n\
##INFO=<ID=NS,Number=1,Type=Integer,Description=\"Number of samples with data\">\n\
##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele frequency\">\n\
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position of a reference block\">\n\
##INFO=<ID=ASM_Chr,Number=1,Type=String,Description=\"Source assembly contig\">\n\
##INFO=<ID=ASM_Start,Number=1,Type=Integer,Description=\"Source assembly start\">\n\
##INFO=<ID=ASM_End,Number=1,Type=Integer,Description=\"Source assembly end\">\n\
##INFO=<ID=ASM_Strand,Number=1,Type=String,Description=\"Source assembly strand\">\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{sample}\n"
    )
}
