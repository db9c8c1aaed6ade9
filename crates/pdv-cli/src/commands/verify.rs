//! Verify command implementation.

use pdv_core::Verifier;
use std::path::PathBuf;

pub fn run(
    package: PathBuf,
    strict: bool,
    json_output: bool,
    sorted_attributes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&package)
        .map_err(|e| format!("Failed to read package {}: {}", package.display(), e))?;

    let verifier = Verifier::new(super::canonicalizer(sorted_attributes));
    let report = verifier
        .verify(&bytes)
        .map_err(|e| format!("Not a preservation package: {}", e))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{:<10} {:<10} {}", "DOCUMENTS", "FINDINGS", "VERDICT");
        println!("{}", "-".repeat(30));
        println!(
            "{:<10} {:<10} {:?}",
            report.documents,
            report.findings.len(),
            report.verdict
        );
        for finding in &report.findings {
            println!("  {}", finding);
        }
    }

    if strict && !report.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}
