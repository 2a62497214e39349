use anyhow::{Context, Result};
use flate2::bufread::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// 128 KB default buffer size, same as pigz.
pub const BUFFER_SIZE: usize = 64 * (1 << 10) * 2;

/// The path that denotes standard input.
pub const STDIN_PATH: &str = "-";

/// Returns true if the path ends with one of the given file extensions
fn is_path_with_extension<P: AsRef<Path>>(p: &P, extensions: [&str; 2]) -> bool {
    if let Some(ext) = p.as_ref().extension() {
        match ext.to_str() {
            Some(x) => extensions.contains(&x),
            None => false,
        }
    } else {
        false
    }
}

/// The set of file extensions to treat as GZIPPED
const GZIP_EXTENSIONS: [&str; 2] = ["gz", "bgz"];

/// Returns true if the path ends with a recognized GZIP file extension
pub fn is_gzip_path<P: AsRef<Path>>(p: &P) -> bool {
    is_path_with_extension(p, GZIP_EXTENSIONS)
}

/// Returns true if the path refers to standard input.
pub fn is_stdin_path<P: AsRef<Path>>(p: &P) -> bool {
    p.as_ref().as_os_str() == STDIN_PATH
}

/// Opens the given path (or standard input for `-`) for reading.
///
/// The input is GZIP-decoded when the path has a GZIP extension, or always when `decompress`
/// is set.
pub fn open_input<P: AsRef<Path>>(path: &P, decompress: bool) -> Result<Box<dyn Read + Send>> {
    let path = path.as_ref();
    // Open the file or standard input
    let raw_handle = if is_stdin_path(&path) {
        Box::new(std::io::stdin()) as Box<dyn Read + Send>
    } else {
        let handle = File::open(path)
            .with_context(|| format!("Error opening input: {}", path.display()))?;
        Box::new(handle) as Box<dyn Read + Send>
    };
    // Wrap it in a buffer
    let buf_handle = BufReader::with_capacity(BUFFER_SIZE, raw_handle);
    // Maybe wrap it in a decompressor
    let is_gzip = is_gzip_path(&path) || decompress;
    if is_gzip {
        Ok(Box::new(MultiGzDecoder::new(buf_handle)))
    } else {
        Ok(Box::new(buf_handle))
    }
}
