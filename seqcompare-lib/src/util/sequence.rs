use crate::util::io::{open_input, BUFFER_SIZE};
use anyhow::{Context, Result};
use derive_getters::Getters;
use seq_io::fasta::{Reader as FastaReader, Record as FastaRecord};
use std::{io::Read, path::Path};

/// A named sequence of symbols, as read from one FASTA record.
#[derive(Default, Debug, PartialEq, Eq, Clone, Getters)]
pub struct Sequence {
    name: String,
    symbols: Vec<u8>,
}

impl Sequence {
    /// Creates a new `Sequence` with the given name and symbols.
    pub fn new(name: &str, symbols: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            symbols: symbols.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The ordered collection of sequences to compare.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct SequenceStore {
    sequences: Vec<Sequence>,
}

impl SequenceStore {
    pub fn new(sequences: Vec<Sequence>) -> Self {
        Self { sequences }
    }

    /// The number of sequences in the store.
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Returns the sequence at the given 0-based index.  Panics if out of bounds.
    pub fn get(&self, index: usize) -> &Sequence {
        &self.sequences[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> + '_ {
        self.sequences.iter()
    }
}

impl From<Vec<Sequence>> for SequenceStore {
    fn from(sequences: Vec<Sequence>) -> Self {
        Self::new(sequences)
    }
}

/// Takes the record name as the leading run of ASCII letters and digits in the FASTA header,
/// so `seq-1 desc` is named `seq`.
fn header_to_name(header: &[u8]) -> String {
    header
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric())
        .map(|&b| char::from(b))
        .collect()
}

/// Builds a [`Sequence`] from a FASTA record, joining wrapped lines and keeping only the
/// alphabetic symbols.
fn record_to_sequence<R: FastaRecord>(record: &R) -> Sequence {
    // NB: the raw record sequence still contains the line breaks, which are dropped here too
    let symbols = record
        .seq()
        .iter()
        .copied()
        .filter(u8::is_ascii_alphabetic)
        .collect();
    Sequence {
        name: header_to_name(record.head()),
        symbols,
    }
}

/// Reads all the FASTA records from the given reader into a [`SequenceStore`].
pub fn from_reader<R: Read>(reader: R) -> Result<SequenceStore> {
    let mut source = FastaReader::with_capacity(reader, BUFFER_SIZE);
    let mut sequences = Vec::new();
    while let Some(record) = source.next() {
        let record = record.with_context(|| {
            format!("Error reading FASTA record #{}", sequences.len() + 1)
        })?;
        sequences.push(record_to_sequence(&record));
    }
    Ok(SequenceStore::new(sequences))
}

/// Reads all the FASTA records from the given path (or `-` for standard input).
pub fn from_fasta<P: AsRef<Path>>(path: &P, decompress: bool) -> Result<SequenceStore> {
    let path = path.as_ref();
    let reader = open_input(&path, decompress)?;
    from_reader(reader).with_context(|| format!("Error parsing FASTA: {}", path.display()))
}
