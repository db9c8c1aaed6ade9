//! Build command implementation.

use chrono::NaiveDate;
use pdv_core::{DocumentInput, PackageBuilder, PreservationProfile};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub struct BuildArgs {
    pub files: Vec<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub profile: Option<PathBuf>,
    pub closure_date: Option<String>,
    pub sorted_attributes: bool,
    pub json: bool,
}

pub fn run(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = match &args.manifest {
        Some(path) => read_manifest(path)?,
        None => args.files.iter().map(DocumentInput::new).collect(),
    };

    let mut builder =
        PackageBuilder::new().with_canonicalizer(super::canonicalizer(args.sorted_attributes));
    if let Some(path) = &args.profile {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read profile {}: {}", path.display(), e))?;
        let profile = PreservationProfile::from_json(&json)
            .map_err(|e| format!("Invalid profile {}: {}", path.display(), e))?;
        builder = builder.with_profile(profile);
    }
    if let Some(date) = &args.closure_date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid closure date {:?}: {}", date, e))?;
        builder = builder.with_closure_date(date);
    }

    let package = builder.build(&inputs)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, package.as_bytes())
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(package.summary())?);
            } else {
                println!(
                    "Wrote {} ({} documents)",
                    path.display(),
                    package.documents().len()
                );
                println!("hash-object: {}", package.aggregate_content_hash());
                println!("hash-ipdv:   {}", package.aggregate_metadata_hash());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(package.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Relative `filePath` entries resolve against the manifest's directory.
fn read_manifest(path: &Path) -> Result<Vec<DocumentInput>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read manifest {}: {}", path.display(), e))?;
    let mut inputs: Vec<DocumentInput> = serde_json::from_str(&json)
        .map_err(|e| format!("Invalid manifest {}: {}", path.display(), e))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for input in &mut inputs {
        if let Some(file) = input.file_path.as_mut() {
            if file.is_relative() && !file.as_os_str().is_empty() {
                *file = base.join(&*file);
            }
        }
    }
    Ok(inputs)
}
