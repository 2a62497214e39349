use super::command::{parse_gap_char, Command, ValueEnum};
use anyhow::{ensure, Context};
use clap::{
    builder::{PossibleValuesParser, TypedValueParser as _},
    Parser,
};
use log::info;
use proglog::{CountFormatterKind, ProgLogBuilder};
use seqcompare::{
    align::{
        pairwise::{num_pairs, MIN_NUM_SEQUENCES},
        Builder, ReportFormat, ReportWriter,
    },
    util::{sequence, version::built_info},
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

/// The number of aligned pairs between progress log messages.
const PROGRESS_UNIT: u64 = 1_000;

////////////////////////////////////////////////////////////////////////////////
// Compare (main class) and it's impls
////////////////////////////////////////////////////////////////////////////////

impl ValueEnum for ReportFormat {
    fn variants<'a>() -> &'a [Self] {
        &[Self::Text, Self::Tsv]
    }
}

/// Computes the optimal global alignment of every pair of sequences in a FASTA file.
///
/// Each pair of records is aligned end to end with the Needleman-Wunsch algorithm, using a
/// linear gap score: an alignment scores `MATCH` for each pair of equal symbols, `MISMATCH` for
/// each pair of different symbols, and `GAP` for each symbol aligned against a gap.  Scores may
/// be of any sign.  When several alignments share the best score, the one reported prefers, at
/// each step traced back from the end, aligning two symbols over a gap in the second sequence,
/// and a gap in the second sequence over a gap in the first sequence.
///
/// Sequence lines may be wrapped; only alphabetic characters are kept.  Symbols are compared
/// case-sensitively.  The record name is the leading run of letters and digits of its
/// header line, so `>seq-1 desc` is named `seq`.
///
/// With `N` records, `N*(N-1)/2` alignments are reported, in the order of the records: the
/// first record versus each later record, then the second record versus each later record, and
/// so on.
///
/// ## Output
///
/// The `text` format reports each pair as:
///
/// ```text
/// Score for alignment of <first> to <second> is <score>
///
/// Solution:
///
/// <first aligned sequence>
///
/// <second aligned sequence>
/// ```
///
/// with a blank line between pairs.  The `tsv` format writes a header line followed by one line
/// per pair with the two names, the score, the CIGAR and the two aligned sequences.
#[derive(Parser, Debug, Clone)]
#[clap(
    version = built_info::VERSION.as_str(),
    term_width = 0,
    allow_negative_numbers = true
)]
pub struct Compare {
    /// The path to the FASTA file of sequences to compare, or `-` for standard input.
    #[clap(display_order = 1)]
    sequences: PathBuf,

    /// Score for a pair of equal symbols.
    #[clap(display_order = 2)]
    match_score: i32,

    /// Score for a pair of different symbols.
    #[clap(display_order = 3)]
    mismatch_score: i32,

    /// Score for a symbol aligned against a gap.
    #[clap(display_order = 4)]
    gap_score: i32,

    /// The number of threads to use, or zero to use all available CPUs.
    #[clap(long, short = 't', default_value = "1", display_order = 5)]
    threads: usize,

    /// Decompress the input as GZIP regardless of its file extension.
    #[clap(long, short = 'z', default_value = "false", display_order = 6)]
    decompress: bool,

    /// The path to the output file, otherwise standard output.
    #[clap(long, short = 'o', display_order = 7)]
    output: Option<PathBuf>,

    /// The output format:
    /// - Text: a block per pair with the score and the two aligned sequences.
    /// - Tsv: a tab-delimited line per pair, after a header line.
    #[clap(
        long,
        short = 'f',
        value_parser = PossibleValuesParser::new(ReportFormat::possible_values())
            .map(|s| s.parse::<ReportFormat>().unwrap()),
        default_value_t = ReportFormat::Text,
        ignore_case = true,
        display_order = 8,
        verbatim_doc_comment
    )]
    format: ReportFormat,

    /// The character used to render a gap.  Letters are not allowed.
    #[clap(
        long,
        value_parser = parse_gap_char,
        default_value = "-",
        display_order = 9
    )]
    gap_char: u8,
}

impl Compare {
    /// Executes the compare command
    pub fn execute(&self) -> anyhow::Result<()> {
        info!("Starting pairwise alignment...");
        info!("Reading sequences from {}", self.sequences.display());
        let store = sequence::from_fasta(&self.sequences, self.decompress)?;
        ensure!(
            store.len() >= MIN_NUM_SEQUENCES,
            "Error of usage: {} (< {}) sequences were found in file {}",
            store.len(),
            MIN_NUM_SEQUENCES,
            self.sequences.display()
        );

        let threads = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };
        info!(
            "Aligning {} pairs from {} sequences with {} thread(s)",
            num_pairs(store.len()),
            store.len(),
            threads
        );

        let driver = Builder::default()
            .match_score(self.match_score)
            .mismatch_score(self.mismatch_score)
            .gap_score(self.gap_score)
            .gap_char(self.gap_char)
            .threads(threads)
            .build_driver()?;

        let progress_logger = ProgLogBuilder::new()
            .name("seqcompare-progress")
            .noun("pairs")
            .verb("Aligned")
            .unit(PROGRESS_UNIT)
            .count_formatter(CountFormatterKind::Comma)
            .build();

        let output: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("Error creating output: {}", path.display()))?,
            ),
            None => Box::new(io::stdout().lock()),
        };
        let mut writer = ReportWriter::new(BufWriter::new(output), self.format)?;
        driver.run(&store, |report| {
            progress_logger.record();
            writer.write(&report)
        })?;
        let count = writer.count();
        writer.finish()?;

        info!("Wrote {} alignments", count);
        Ok(())
    }
}

impl Command for Compare {
    fn execute(&self) -> anyhow::Result<()> {
        Compare::execute(self)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use seqcompare::align::{aligners::constants::DEFAULT_GAP_CHAR, ReportFormat};
    use std::path::PathBuf;

    use super::Compare;

    fn run(fasta: &str, args: &[&str]) -> anyhow::Result<String> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("seqs.fa");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, fasta).unwrap();
        let mut argv = vec!["compare", input.to_str().unwrap()];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["--output", output.to_str().unwrap()]);
        Compare::parse_from(argv).execute()?;
        Ok(std::fs::read_to_string(output).unwrap())
    }

    /// Check that the argument parser works
    #[test]
    fn test_parse() {
        let cmd = Compare::parse_from(["compare", "seqs.fa", "1", "-1", "-2"]);
        assert_eq!(cmd.sequences, PathBuf::from("seqs.fa"));
        assert_eq!(cmd.match_score, 1);
        assert_eq!(cmd.mismatch_score, -1);
        assert_eq!(cmd.gap_score, -2);
        assert_eq!(cmd.threads, 1);
        assert!(!cmd.decompress);
        assert_eq!(cmd.output, None);
        assert_eq!(cmd.format, ReportFormat::Text);
        assert_eq!(cmd.gap_char, DEFAULT_GAP_CHAR);
    }

    #[test]
    fn test_parse_options() {
        let cmd = Compare::parse_from([
            "compare", "-", "2", "-3", "-1", "-t", "4", "-z", "-f", "TSV", "--gap-char", ".",
        ]);
        assert_eq!(cmd.sequences, PathBuf::from("-"));
        assert_eq!(cmd.threads, 4);
        assert!(cmd.decompress);
        assert_eq!(cmd.format, ReportFormat::Tsv);
        assert_eq!(cmd.gap_char, b'.');
    }

    #[test]
    fn test_non_integer_scores_are_rejected() {
        let err = Compare::try_parse_from(["compare", "seqs.fa", "1", "x2", "-1"]).unwrap_err();
        assert!(err.to_string().contains("x2"));
        assert!(Compare::try_parse_from(["compare", "seqs.fa", "1.5", "-1", "-1"]).is_err());
        assert!(Compare::try_parse_from(["compare", "seqs.fa", "1", "-1"]).is_err());
    }

    #[test]
    fn test_compare() {
        let fasta = ">seq1 first\nGCAT\nGCU\n>seq2\nGATTACA\n";
        let output = run(fasta, &["1", "-1", "-1"]).unwrap();
        assert_eq!(
            output,
            "Score for alignment of seq1 to seq2 is 0\n\nSolution:\n\nGCA-TGCU\n\nG-ATTACA"
        );
    }

    #[test]
    fn test_compare_threads_and_tsv() {
        let fasta = ">a\nACGT\n>b\nAGT\n>c\n>d\nACGTT\n";
        let single = run(fasta, &["1", "-1", "-1", "--format", "tsv"]).unwrap();
        let threaded = run(fasta, &["1", "-1", "-1", "--format", "tsv", "-t", "3"]).unwrap();
        assert_eq!(single, threaded);
        let lines: Vec<&str> = single.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "a\tb\t2\t1=1I2=\tACGT\tA-GT");
        assert_eq!(lines[2], "a\tc\t-4\t4I\tACGT\t----");
        assert_eq!(lines[3], "a\td\t3\t3=1D1=\tACG-T\tACGTT");
    }

    #[test]
    fn test_letter_gap_char_is_rejected() {
        let result = Compare::try_parse_from(["compare", "s.fa", "1", "-1", "-1", "--gap-char", "N"]);
        assert!(result.unwrap_err().to_string().contains("must not be a letter"));
    }

    #[test]
    fn test_names_are_alphanumeric_prefixes() {
        let fasta = ">seq-1 first\nAC\n>chr1_a\nAC\n";
        let output = run(fasta, &["1", "-1", "-1", "--gap-char", "."]).unwrap();
        assert!(output.starts_with("Score for alignment of seq to chr1 is 2\n"));
    }

    #[test]
    fn test_too_few_sequences() {
        let err = run(">only\nACGT\n", &["1", "-1", "-1"]).unwrap_err();
        assert!(err.to_string().starts_with("Error of usage: 1 (< 2) sequences"));
    }

    #[test]
    fn test_missing_input() {
        let cmd = Compare::parse_from(["compare", "/does/not/exist.fa", "1", "-1", "-1"]);
        let err = cmd.execute().unwrap_err();
        assert!(format!("{err:#}").contains("Error opening input: /does/not/exist.fa"));
    }
}
