//! Candidate domain generation.
//!
//! Candidates come from two places: a list of literal domains, and the
//! cross-product of a word list with a TLD list. Input lists are plain text,
//! one entry per line; surrounding whitespace is trimmed and blank lines are
//! skipped.
//!
//! # Examples
//!
//! ```
//! use domain_scan_lib::generate::combine;
//!
//! let words = vec!["foo".to_string(), "bar".to_string()];
//! let tlds = vec!["com".to_string(), "net".to_string()];
//! let domains: Vec<String> = combine(&words, &tlds).collect();
//! assert_eq!(domains, vec!["foo.com", "foo.net", "bar.com", "bar.net"]);
//! ```

use crate::error::DomainScanError;
use std::fs;
use std::path::Path;

/// Read a newline-delimited list, trimming entries and dropping blank lines.
///
/// # Errors
///
/// Returns `DomainScanError::FileError` if the file cannot be read.
pub fn read_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DomainScanError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| DomainScanError::file_error(path.to_string_lossy(), e.to_string()))?;

    Ok(parse_list(&content))
}

/// Split list content into trimmed, non-empty entries.
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Combine every word with every TLD as `word.tld`.
///
/// Ordering is word-major: all TLDs for the first word, then all TLDs for
/// the second word, and so on.
pub fn combine<'a>(words: &'a [String], tlds: &'a [String]) -> impl Iterator<Item = String> + 'a {
    words
        .iter()
        .flat_map(move |word| tlds.iter().map(move |tld| format!("{}.{}", word, tld)))
}

/// Read a word list and a TLD list and produce all `word.tld` combinations.
///
/// # Errors
///
/// Returns `DomainScanError::FileError` if either file cannot be read.
pub fn generate_domains<W, T>(wordlist_file: W, tld_file: T) -> Result<Vec<String>, DomainScanError>
where
    W: AsRef<Path>,
    T: AsRef<Path>,
{
    let words = read_list(wordlist_file)?;
    let tlds = read_list(tld_file)?;

    Ok(combine(&words, &tlds).collect())
}

/// Build the full candidate list: literal domains first, then generated ones.
///
/// Duplicates between the two sources are kept.
pub fn load_candidates<D, W, T>(
    domains_file: D,
    wordlist_file: W,
    tld_file: T,
) -> Result<Vec<String>, DomainScanError>
where
    D: AsRef<Path>,
    W: AsRef<Path>,
    T: AsRef<Path>,
{
    let mut candidates = read_list(domains_file)?;
    candidates.extend(generate_domains(wordlist_file, tld_file)?);
    Ok(candidates)
}
