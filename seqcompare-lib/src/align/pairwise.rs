use anyhow::{anyhow, Result};
use derive_getters::Getters;
use flume::{bounded, Receiver, Sender};
use itertools::Itertools;
use std::thread;

use crate::{
    align::{
        aligners::GlobalAligner,
        scoring::{MatchFunc, MatchParams},
    },
    util::sequence::SequenceStore,
};

/// The minimum number of sequences required to have at least one pair to align.
pub const MIN_NUM_SEQUENCES: usize = 2;

/// The number of pairs to include per chunk sent to an aligner thread.
pub const PAIRS_PER_CHUNK: usize = 16;

/// The number of chunks allowed in a channel, scaled by the number of threads.
pub const CHANNEL_NUM_CHUNKS: usize = 4;

/// The result of aligning one pair of sequences from a [`SequenceStore`].
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
pub struct PairReport {
    /// The 0-based index of the first sequence
    index_a: usize,
    /// The 0-based index of the second sequence
    index_b: usize,
    name_a: String,
    name_b: String,
    score: i32,
    cigar: String,
    /// The first sequence with gaps inserted
    aligned_a: Vec<u8>,
    /// The second sequence with gaps inserted
    aligned_b: Vec<u8>,
}

/// Returns the number of unordered pairs among `count` sequences.
pub fn num_pairs(count: usize) -> usize {
    count * count.saturating_sub(1) / 2
}

/// Enumerates the unordered pairs `(i, j)` with `i < j < count`, ordered by `i` then `j`.
pub fn pair_indices(count: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..count).tuple_combinations::<(usize, usize)>()
}

/// A chunk of pairs sent to an aligner thread.
struct InputMessage {
    /// The pairs to align
    pairs: Vec<(usize, usize)>,
    /// Where the reports will be sent after alignment
    oneshot: Sender<Result<Vec<PairReport>>>,
}

/// Aligns every pair of sequences in a [`SequenceStore`].
#[derive(Copy, Clone, Debug)]
pub struct PairwiseDriver<F: MatchFunc = MatchParams> {
    aligner: GlobalAligner<F>,
    threads: usize,
    gap_char: u8,
}

impl<F: MatchFunc + Sync> PairwiseDriver<F> {
    pub fn new(aligner: GlobalAligner<F>, threads: usize, gap_char: u8) -> Self {
        Self {
            aligner,
            threads: threads.max(1),
            gap_char,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Aligns the sequences at the two indexes and builds the report.
    pub fn align_pair(
        &self,
        store: &SequenceStore,
        index_a: usize,
        index_b: usize,
    ) -> Result<PairReport> {
        let a = store.get(index_a);
        let b = store.get(index_b);
        let alignment = self.aligner.align(a.symbols(), b.symbols())?;
        let (aligned_a, aligned_b) = alignment.render(a.symbols(), b.symbols(), self.gap_char);
        Ok(PairReport {
            index_a,
            index_b,
            name_a: a.name().clone(),
            name_b: b.name().clone(),
            score: alignment.score,
            cigar: alignment.cigar(),
            aligned_a,
            aligned_b,
        })
    }

    /// Aligns every pair and collects the reports, in pair order.
    pub fn align_all(&self, store: &SequenceStore) -> Result<Vec<PairReport>> {
        let mut reports = Vec::with_capacity(num_pairs(store.len()));
        self.run(store, |report| {
            reports.push(report);
            Ok(())
        })?;
        Ok(reports)
    }

    /// Aligns every pair and passes each report to `on_report`, in pair order regardless of the
    /// number of threads.  Stops at the first error, from either an alignment or `on_report`.
    pub fn run<C>(&self, store: &SequenceStore, mut on_report: C) -> Result<()>
    where
        C: FnMut(PairReport) -> Result<()>,
    {
        if self.threads == 1 || num_pairs(store.len()) <= 1 {
            for (index_a, index_b) in pair_indices(store.len()) {
                on_report(self.align_pair(store, index_a, index_b)?)?;
            }
            return Ok(());
        }

        // Channel to send chunks of pairs to align
        let (to_align_tx, to_align_rx): (Sender<InputMessage>, Receiver<InputMessage>) =
            bounded(CHANNEL_NUM_CHUNKS * self.threads);

        // Channel to send receivers for each aligned chunk of pairs. The receivers maintain the
        // order of the pairs.
        let (to_output_tx, to_output_rx): (
            Sender<Receiver<Result<Vec<PairReport>>>>,
            Receiver<Receiver<Result<Vec<PairReport>>>>,
        ) = bounded(CHANNEL_NUM_CHUNKS * self.threads);

        thread::scope(|scope| {
            // Create the thread to chunk the pairs
            scope.spawn(move || {
                for chunk in &pair_indices(store.len()).chunks(PAIRS_PER_CHUNK) {
                    let (oneshot, oneshot_rx) = bounded(1);
                    let msg = InputMessage {
                        pairs: chunk.collect(),
                        oneshot,
                    };
                    // NB: a send fails only when the consumer stopped early
                    if to_align_tx.send(msg).is_err() || to_output_tx.send(oneshot_rx).is_err() {
                        break;
                    }
                }
            });

            // Create and start the aligner threads
            for _ in 0..self.threads {
                let to_align_rx = to_align_rx.clone();
                scope.spawn(move || {
                    for msg in to_align_rx.iter() {
                        let reports = msg
                            .pairs
                            .iter()
                            .map(|&(index_a, index_b)| self.align_pair(store, index_a, index_b))
                            .collect::<Result<Vec<_>>>();
                        // The receiver is gone if the consumer stopped early
                        let _ = msg.oneshot.send(reports);
                    }
                });
            }
            drop(to_align_rx);

            Self::consume(to_output_rx, &mut on_report)
        })
    }

    /// Receives the chunks of reports in order, passing each report to `on_report`.
    fn consume<C>(
        to_output_rx: Receiver<Receiver<Result<Vec<PairReport>>>>,
        on_report: &mut C,
    ) -> Result<()>
    where
        C: FnMut(PairReport) -> Result<()>,
    {
        for receiver in to_output_rx.iter() {
            let reports = receiver
                .recv()
                .map_err(|_| anyhow!("Bug: aligner thread exited before sending its results"))??;
            for report in reports {
                on_report(report)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use anyhow::bail;
    use itertools::Itertools;
    use rstest::rstest;

    use super::{num_pairs, pair_indices, PairwiseDriver};
    use crate::{
        align::{aligners::Builder, aligners::GlobalAligner, scoring::Scoring},
        util::sequence::{Sequence, SequenceStore},
    };

    fn store(count: usize) -> SequenceStore {
        let symbols = ["GCATGCU", "GATTACA", "ACGT", "", "TTGACCA", "A", "CCCGGG"];
        (0..count)
            .map(|i| Sequence::new(&format!("seq{i}"), symbols[i % symbols.len()].as_bytes()))
            .collect_vec()
            .into()
    }

    fn driver(threads: usize) -> PairwiseDriver {
        Builder::default().threads(threads).build_driver().unwrap()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 3)]
    #[case(7, 21)]
    fn test_num_pairs(#[case] count: usize, #[case] expected: usize) {
        assert_eq!(num_pairs(count), expected);
        assert_eq!(pair_indices(count).count(), expected);
    }

    #[rstest]
    fn test_pair_indices_order() {
        assert_eq!(
            pair_indices(4).collect_vec(),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[rstest]
    fn test_align_pair() {
        let report = driver(1).align_pair(&store(2), 0, 1).unwrap();
        assert_eq!(report.name_a(), "seq0");
        assert_eq!(report.name_b(), "seq1");
        assert_eq!(*report.score(), 0);
        assert_eq!(report.cigar(), "1=1I1=1D1=1X1=1X");
        assert_eq!(report.aligned_a(), b"GCA-TGCU");
        assert_eq!(report.aligned_b(), b"G-ATTACA");
    }

    #[rstest]
    fn test_align_pair_gap_char() {
        let driver = PairwiseDriver::new(
            GlobalAligner::new(Scoring::from_scores(1, -1, -1)),
            1,
            b'_',
        );
        let report = driver.align_pair(&store(2), 0, 1).unwrap();
        assert_eq!(report.aligned_a(), b"GCA_TGCU");
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_too_few_sequences(#[case] count: usize) {
        assert!(driver(2).align_all(&store(count)).unwrap().is_empty());
    }

    #[rstest]
    #[case(1, 2)]
    #[case(1, 7)]
    #[case(2, 7)]
    #[case(4, 12)]
    #[case(3, 25)]
    fn test_align_all_order(#[case] threads: usize, #[case] count: usize) {
        let reports = driver(threads).align_all(&store(count)).unwrap();
        assert_eq!(reports.len(), num_pairs(count));
        let indices = reports
            .iter()
            .map(|r| (*r.index_a(), *r.index_b()))
            .collect_vec();
        assert_eq!(indices, pair_indices(count).collect_vec());
    }

    #[rstest]
    fn test_threads_match_single_thread() {
        let store = store(20);
        let expected = driver(1).align_all(&store).unwrap();
        assert_eq!(driver(4).align_all(&store).unwrap(), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn test_stops_on_consumer_error(#[case] threads: usize) {
        let mut seen = 0;
        let result = driver(threads).run(&store(30), |_| {
            seen += 1;
            if seen == 5 {
                bail!("stop");
            }
            Ok(())
        });
        assert_eq!(result.unwrap_err().to_string(), "stop");
        assert_eq!(seen, 5);
    }

    #[rstest]
    fn test_zero_threads_is_one_thread() {
        assert_eq!(driver(0).threads(), 1);
    }
}
