//! Filesystem helpers built on `cap-std` and `camino`.

use std::io::{self, BufReader, Read};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<BufReader<fs_utf8::File>> {
    fs_utf8::File::open_ambient(path, ambient_authority()).map(BufReader::new)
}

/// Read the whole file at `path` as text.
pub(crate) fn read_utf8_to_string(path: &Utf8Path) -> io::Result<String> {
    let mut reader = open_utf8_file(path)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(text)
}
