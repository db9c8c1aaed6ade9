//! Canonicalize command implementation.

use pdv_canonical::{parse, Canonicalize};
use std::io::{self, Read, Write};
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, sorted_attributes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = super::canonicalizer(sorted_attributes);

    // Read XML from file or stdin
    let bytes = if let Some(path) = input {
        std::fs::read(&path).map_err(|e| format!("Failed to read file {}: {}", path.display(), e))?
    } else {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        buffer
    };

    let element = parse(&bytes).map_err(|e| format!("Invalid XML: {}", e))?;

    let result = canonicalizer
        .canonicalize(&element)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&result)?;
    stdout.flush()?;
    Ok(())
}
