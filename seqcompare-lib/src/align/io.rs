use anyhow::{anyhow, Error, Result};
use std::{fmt::Display, io::Write, str::FromStr};

use crate::align::pairwise::PairReport;

/// The separator written between consecutive reports in the text format.
const TEXT_SEPARATOR: &[u8] = b"\n\n";

/// The header line of the TSV format.
pub const TSV_HEADER: &str = "name_a\tname_b\tscore\tcigar\taligned_a\taligned_b";

/// The supported layouts for pairwise alignment reports.
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone)]
pub enum ReportFormat {
    /// A human readable block per pair: the score, then the two aligned sequences.
    #[default]
    Text,
    /// One tab-delimited line per pair, after a header line.
    Tsv,
}

impl Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "tsv" => Ok(ReportFormat::Tsv),
            _ => Err(anyhow!("Invalid report format: {}", s)),
        }
    }
}

/// Writes [`PairReport`]s in a given [`ReportFormat`].
pub struct ReportWriter<W: Write> {
    writer: W,
    format: ReportFormat,
    count: usize,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W, format: ReportFormat) -> Result<Self> {
        let mut writer = Self {
            writer,
            format,
            count: 0,
        };
        if format == ReportFormat::Tsv {
            writeln!(writer.writer, "{TSV_HEADER}")?;
        }
        Ok(writer)
    }

    /// The number of reports written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn write(&mut self, report: &PairReport) -> Result<()> {
        match self.format {
            ReportFormat::Text => self.write_text(report)?,
            ReportFormat::Tsv => self.write_tsv(report)?,
        }
        self.count += 1;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_text(&mut self, report: &PairReport) -> Result<()> {
        // NB: reports are separated by a blank line, with nothing after the last
        if self.count > 0 {
            self.writer.write_all(TEXT_SEPARATOR)?;
        }
        write!(
            self.writer,
            "Score for alignment of {} to {} is {}\n\nSolution:\n\n",
            report.name_a(),
            report.name_b(),
            report.score()
        )?;
        self.writer.write_all(report.aligned_a())?;
        self.writer.write_all(TEXT_SEPARATOR)?;
        self.writer.write_all(report.aligned_b())?;
        Ok(())
    }

    fn write_tsv(&mut self, report: &PairReport) -> Result<()> {
        write!(
            self.writer,
            "{}\t{}\t{}\t{}\t",
            report.name_a(),
            report.name_b(),
            report.score(),
            report.cigar()
        )?;
        self.writer.write_all(report.aligned_a())?;
        self.writer.write_all(b"\t")?;
        self.writer.write_all(report.aligned_b())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use rstest::rstest;

    use super::{ReportFormat, ReportWriter};
    use crate::{
        align::{aligners::Builder, pairwise::PairReport},
        util::sequence::{Sequence, SequenceStore},
    };

    fn reports() -> Vec<PairReport> {
        let store = SequenceStore::new(vec![
            Sequence::new("seq1", b"GCATGCU"),
            Sequence::new("seq2", b"GATTACA"),
            Sequence::new("seq3", b"GCA"),
        ]);
        Builder::default()
            .build_driver()
            .unwrap()
            .align_all(&store)
            .unwrap()
    }

    fn write_all(format: ReportFormat, reports: &[PairReport]) -> String {
        let mut writer = ReportWriter::new(Vec::new(), format).unwrap();
        for report in reports {
            writer.write(report).unwrap();
        }
        assert_eq!(writer.count(), reports.len());
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[rstest]
    #[case("text", ReportFormat::Text)]
    #[case("TXT", ReportFormat::Text)]
    #[case("tsv", ReportFormat::Tsv)]
    fn test_format_from_str(#[case] value: &str, #[case] expected: ReportFormat) {
        assert_eq!(value.parse::<ReportFormat>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<ReportFormat>().unwrap(), expected);
    }

    #[rstest]
    fn test_invalid_format() {
        assert!("sam".parse::<ReportFormat>().is_err());
    }

    #[rstest]
    fn test_text_single_report() {
        let reports = reports();
        let actual = write_all(ReportFormat::Text, &reports[0..1]);
        let expected = "Score for alignment of seq1 to seq2 is 0\n\nSolution:\n\nGCA-TGCU\n\nG-ATTACA";
        assert_eq!(actual, expected);
    }

    #[rstest]
    fn test_text_reports_are_separated() {
        let reports = reports();
        let actual = write_all(ReportFormat::Text, &reports);
        let blocks: Vec<&str> = actual.split("\n\nScore").collect();
        assert_eq!(blocks.len(), 3);
        assert!(blocks[1].starts_with(" for alignment of seq1 to seq3 is -1"));
        assert!(blocks[2].starts_with(" for alignment of seq2 to seq3 is -1"));
        assert!(!actual.ends_with('\n'));
    }

    #[rstest]
    fn test_text_no_reports() {
        assert_eq!(write_all(ReportFormat::Text, &[]), "");
    }

    #[rstest]
    fn test_tsv() {
        let reports = reports();
        let actual = write_all(ReportFormat::Tsv, &reports[0..1]);
        let expected = "name_a\tname_b\tscore\tcigar\taligned_a\taligned_b\n\
                        seq1\tseq2\t0\t1=1I1=1D1=1X1=1X\tGCA-TGCU\tG-ATTACA\n";
        assert_eq!(actual, expected);
    }
}
