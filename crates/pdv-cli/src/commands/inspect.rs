//! Inspect command implementation.

use crate::output::{self, DocumentRow};
use pdv_canonical::{parse, Element};
use pdv_core::metadata::{RECORD, RECORD_ID_ATTR};
use pdv_core::package::{
    ATTR_HASH, ATTR_NAME, ATTR_TYPE, DOCUMENT, HASH_IPDV, HASH_OBJECT, IPDV, OBJ_STORED, ROOT,
    STORE_TIME,
};
use serde_json::json;
use std::path::PathBuf;

pub fn run(package: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(&package)
        .map_err(|e| format!("Failed to read package {}: {}", package.display(), e))?;
    let root = parse(&bytes).map_err(|e| format!("Invalid XML: {}", e))?;
    if root.name() != ROOT {
        return Err(format!("Unexpected root element <{}>", root.name()).into());
    }
    let obj_stored = root
        .child(OBJ_STORED)
        .ok_or_else(|| format!("Missing <{}>", OBJ_STORED))?;
    let ipdv = root
        .child(IPDV)
        .ok_or_else(|| format!("Missing <{}>", IPDV))?;

    let records: Vec<&Element> = ipdv.elements_named(RECORD).collect();
    let rows: Vec<DocumentRow> = obj_stored
        .elements_named(DOCUMENT)
        .enumerate()
        .map(|(index, document)| {
            let record = records.get(index).copied();
            DocumentRow {
                index,
                file_name: document.attribute(ATTR_NAME).unwrap_or("?").to_string(),
                mime_type: document.attribute(ATTR_TYPE).unwrap_or("?").to_string(),
                hash: document.attribute(ATTR_HASH).unwrap_or("?").to_string(),
                size_bytes: decoded_len(&document.text()),
                document_id: record
                    .and_then(|r| r.attribute(RECORD_ID_ATTR))
                    .unwrap_or("?")
                    .to_string(),
                subject: record
                    .and_then(|r| r.child("oggettodocumento"))
                    .map(|e| e.text())
                    .unwrap_or_default(),
                closure_date: record
                    .and_then(|r| r.child("datachiusura"))
                    .map(|e| e.text())
                    .unwrap_or_default(),
            }
        })
        .collect();

    let trailer = |name: &str| ipdv.child(name).map(|e| e.text()).unwrap_or_default();

    if json_output {
        let output = json!({
            "documents": rows.iter().map(|row| json!({
                "index": row.index,
                "fileName": row.file_name,
                "mimeType": row.mime_type,
                "hash": row.hash,
                "sizeBytes": row.size_bytes,
                "documentId": row.document_id,
                "subject": row.subject,
                "closureDate": row.closure_date,
            })).collect::<Vec<_>>(),
            "documentCount": rows.len(),
            "recordCount": records.len(),
            "metadataHash": trailer(HASH_IPDV),
            "contentHash": trailer(HASH_OBJECT),
            "retentionPeriod": trailer(STORE_TIME),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output::print_table_header();
        for row in &rows {
            println!("{}", output::format_table_row(row));
        }
        println!();
        println!("hash-ipdv:   {}", trailer(HASH_IPDV));
        println!("hash-object: {}", trailer(HASH_OBJECT));
        println!("store-time:  {}", trailer(STORE_TIME));
    }

    Ok(())
}

/// Decoded size of a base64 payload, from its length and padding.
fn decoded_len(encoded: &str) -> u64 {
    let trimmed = encoded.trim_end_matches('=');
    let padding = encoded.len() - trimmed.len();
    ((encoded.len() / 4) * 3).saturating_sub(padding) as u64
}
