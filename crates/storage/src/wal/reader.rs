// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL reader for iterating and validating entries
//!
//! Invalid entries (checksum mismatch or parse errors) mark the truncation
//! point: a crash mid-append leaves a torn last line.

use super::entry::WalEntry;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when reading WAL entries
#[derive(Debug, Error)]
pub enum WalReadError {
    #[error("corrupted entry at line {line}: {reason}")]
    Corrupted { line: u64, reason: String },
    #[error("checksum mismatch at line {line}")]
    ChecksumMismatch { line: u64 },
    #[error("sequence gap at line {line}: expected {expected}, found {found}")]
    SequenceGap { line: u64, expected: u64, found: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// WAL reader for iterating over entries
pub struct WalReader {
    path: PathBuf,
}

impl WalReader {
    /// Create a reader; a missing file reads as empty
    pub fn open(path: &Path) -> Result<Self, WalReadError> {
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Iterate over all valid entries
    pub fn entries(&self) -> Result<WalEntryIter, WalReadError> {
        WalEntryIter::new(&self.path)
    }

    /// Last valid sequence number
    pub fn last_sequence(&self) -> Result<Option<u64>, WalReadError> {
        let mut last = None;
        for entry_result in self.entries()? {
            match entry_result {
                Ok(entry) => last = Some(entry.sequence),
                Err(_) => break,
            }
        }
        Ok(last)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate a WAL file and report where it stops being readable
    pub fn validate(&self) -> Result<WalValidation, WalReadError> {
        let mut valid_entries = 0u64;
        let mut last_valid_sequence = None;
        let mut corruption = None;

        let mut iter = self.entries()?;
        while let Some(entry_result) = iter.next() {
            match entry_result {
                Ok(entry) => {
                    valid_entries += 1;
                    last_valid_sequence = Some(entry.sequence);
                }
                Err(e) => {
                    corruption = Some(WalCorruption {
                        line: valid_entries + 1,
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        Ok(WalValidation {
            valid_entries,
            last_valid_sequence,
            last_valid_position: iter.last_valid_position(),
            corruption,
        })
    }
}

/// Iterator over WAL entries with position tracking
pub struct WalEntryIter {
    reader: Option<BufReader<File>>,
    line_number: u64,
    expected_sequence: u64,
    /// Byte position after the last successfully read and validated entry
    last_valid_position: u64,
}

impl WalEntryIter {
    fn new(path: &Path) -> Result<Self, WalReadError> {
        let reader = if path.exists() {
            Some(BufReader::new(File::open(path)?))
        } else {
            None
        };

        Ok(Self {
            reader,
            line_number: 0,
            expected_sequence: 0,
            last_valid_position: 0,
        })
    }

    pub fn last_valid_position(&self) -> u64 {
        self.last_valid_position
    }
}

impl Iterator for WalEntryIter {
    type Item = Result<WalEntry, WalReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let entry = match WalEntry::from_line(trimmed) {
                        Ok(e) => e,
                        Err(e) => {
                            return Some(Err(WalReadError::Corrupted {
                                line: self.line_number,
                                reason: e.to_string(),
                            }));
                        }
                    };

                    if !entry.verify() {
                        return Some(Err(WalReadError::ChecksumMismatch {
                            line: self.line_number,
                        }));
                    }

                    // Positions are canonical; a hole would shift every later node
                    if entry.sequence != self.expected_sequence {
                        return Some(Err(WalReadError::SequenceGap {
                            line: self.line_number,
                            expected: self.expected_sequence,
                            found: entry.sequence,
                        }));
                    }

                    self.expected_sequence += 1;
                    self.last_valid_position =
                        reader.stream_position().unwrap_or(self.last_valid_position);
                    return Some(Ok(entry));
                }
                Err(e) => return Some(Err(WalReadError::Io(e))),
            }
        }
    }
}

/// Validation result for a WAL file
#[derive(Debug)]
pub struct WalValidation {
    pub valid_entries: u64,
    pub last_valid_sequence: Option<u64>,
    pub last_valid_position: u64,
    pub corruption: Option<WalCorruption>,
}

/// Information about corruption found in a WAL file
#[derive(Debug)]
pub struct WalCorruption {
    pub line: u64,
    pub reason: String,
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
