use chrono::NaiveDate;
use pdv_canonical::{
    parse, sha256_hex, AttributeOrder, CanonicalizationError, Canonicalize, Canonicalizer, Element,
};
use pdv_core::{
    build_pdv, DocumentId, DocumentInput, FixedIdGenerator, PackageBuilder, PdvError,
    PreservationProfile,
};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ID_A: &str = "DOC-A-00000000000001";
const ID_B: &str = "DOC-B-00000000000002";

fn make_builder() -> PackageBuilder {
    PackageBuilder::new()
        .with_closure_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        .with_id_generator(FixedIdGenerator::new(DocumentId::generated(1_700_000_000, 42)))
}

fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn hello_world(dir: &TempDir) -> Vec<DocumentInput> {
    vec![
        DocumentInput::new(write(dir, "a.txt", b"hello"))
            .with_document_id(ID_A)
            .with_subject("First"),
        DocumentInput::new(write(dir, "b.txt", b"world"))
            .with_document_id(ID_B)
            .with_subject("Second"),
    ]
}

fn sha256_hex_of(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[test]
fn two_document_scenario_matches_independent_computation() {
    let dir = TempDir::new().unwrap();
    let package = make_builder().build(&hello_world(&dir)).unwrap();

    let hello = sha256_hex_of(b"hello");
    let world = sha256_hex_of(b"world");
    let expected = sha256_hex_of(format!("{hello}{world}").as_bytes());

    assert_eq!(package.documents()[0].content_hash.as_str(), hello);
    assert_eq!(package.documents()[1].content_hash.as_str(), world);
    assert_eq!(package.aggregate_content_hash().as_str(), expected);
    assert_eq!(
        expected,
        "15e178b71fae8849ee562c9cc0d7ea322fba6cd495411329d47234479167cc8b"
    );
}

#[test]
fn package_layout_is_stable() {
    let dir = TempDir::new().unwrap();
    let package = make_builder().build(&hello_world(&dir)).unwrap();
    let root = parse(package.as_bytes()).unwrap();

    assert_eq!(root.name(), "pdv");
    let names: Vec<_> = root.elements().map(Element::name).collect();
    assert_eq!(names, ["obj-stored", "ipdv"]);

    let documents: Vec<_> = root.child("obj-stored").unwrap().elements().collect();
    assert_eq!(documents.len(), 2);
    let first = documents[0];
    let attributes: Vec<_> = first.attributes().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(attributes, ["type", "name", "hashType", "hash"]);
    assert_eq!(first.attribute("type"), Some("text/plain"));
    assert_eq!(first.attribute("name"), Some("a.txt"));
    assert_eq!(first.attribute("hashType"), Some("SHA256"));
    assert_eq!(first.text(), "aGVsbG8=");

    let ipdv: Vec<_> = root
        .child("ipdv")
        .unwrap()
        .elements()
        .map(Element::name)
        .collect();
    assert_eq!(
        ipdv,
        ["documento", "documento", "hash-ipdv", "hash-object", "store-time"]
    );
    let ipdv = root.child("ipdv").unwrap();
    assert_eq!(ipdv.child("store-time").unwrap().text(), "12 years");
    assert_eq!(
        ipdv.child("hash-object").unwrap().text(),
        package.aggregate_content_hash().as_str()
    );
    assert_eq!(package.retention_period(), "12 years");
}

#[test]
fn output_has_no_declaration_or_whitespace_between_elements() {
    let dir = TempDir::new().unwrap();
    let bytes = make_builder().build(&hello_world(&dir)).unwrap().into_bytes();
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("<pdv><obj-stored><document type=\"text/plain\" name=\"a.txt\""));
    assert!(text.ends_with("<store-time>12 years</store-time></ipdv></pdv>"));
    assert!(!text.contains("?>"));
    assert!(!text.contains(">\n"));
    assert!(!text.contains("/>"));
}

#[test]
fn metadata_hash_covers_canonical_records_in_order() {
    let dir = TempDir::new().unwrap();
    let package = make_builder().build(&hello_world(&dir)).unwrap();
    let root = parse(package.as_bytes()).unwrap();

    let canonicalizer = Canonicalizer::default();
    let mut concatenated = Vec::new();
    for record in root.child("ipdv").unwrap().elements_named("documento") {
        concatenated.extend(canonicalizer.canonicalize(record).unwrap());
    }
    assert_eq!(sha256_hex(&concatenated), *package.aggregate_metadata_hash());
    assert_eq!(
        root.child("ipdv").unwrap().child("hash-ipdv").unwrap().text(),
        package.aggregate_metadata_hash().as_str()
    );
}

#[test]
fn repeated_builds_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let inputs = hello_world(&dir);
    let builder = make_builder();
    assert_eq!(
        builder.build(&inputs).unwrap().as_bytes(),
        builder.build(&inputs).unwrap().as_bytes()
    );

    // Generated ids are pinned by the fixed generator too.
    let defaults = vec![DocumentInput::new(dir.path().join("a.txt"))];
    assert_eq!(
        builder.build(&defaults).unwrap().into_bytes(),
        make_builder().build(&defaults).unwrap().into_bytes()
    );
}

#[test]
fn builds_differ_only_in_closure_date() {
    let dir = TempDir::new().unwrap();
    let inputs = hello_world(&dir);
    let first = make_builder().build(&inputs).unwrap();
    let later = make_builder()
        .with_closure_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
        .build(&inputs)
        .unwrap();

    assert_eq!(first.aggregate_content_hash(), later.aggregate_content_hash());
    assert_ne!(first.aggregate_metadata_hash(), later.aggregate_metadata_hash());

    let first = String::from_utf8(first.into_bytes()).unwrap();
    let later = String::from_utf8(later.into_bytes()).unwrap();
    let hash_start = first.find("<hash-ipdv>").unwrap();
    assert_eq!(
        first[..hash_start].replace("2024-01-01", "2025-06-30"),
        later[..later.find("<hash-ipdv>").unwrap()]
    );
}

#[test]
fn swapping_documents_changes_both_aggregates() {
    let dir = TempDir::new().unwrap();
    let inputs = hello_world(&dir);
    let reversed: Vec<_> = inputs.iter().rev().cloned().collect();

    let forward = make_builder().build(&inputs).unwrap();
    let backward = make_builder().build(&reversed).unwrap();
    assert_ne!(forward.aggregate_content_hash(), backward.aggregate_content_hash());
    assert_ne!(forward.aggregate_metadata_hash(), backward.aggregate_metadata_hash());
}

#[test]
fn tampering_with_one_document_is_local() {
    let dir = TempDir::new().unwrap();
    let inputs = hello_world(&dir);
    let before = make_builder().build(&inputs).unwrap();

    fs::write(dir.path().join("a.txt"), b"jello").unwrap();
    let after = make_builder().build(&inputs).unwrap();

    assert_ne!(before.documents()[0].content_hash, after.documents()[0].content_hash);
    assert_eq!(before.documents()[1].content_hash, after.documents()[1].content_hash);
    assert_ne!(before.aggregate_content_hash(), after.aggregate_content_hash());
    assert_eq!(before.aggregate_metadata_hash(), after.aggregate_metadata_hash());
}

#[test]
fn file_name_defaults_to_basename() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "report.txt", b"quarterly");
    let package = make_builder().build(&[DocumentInput::new(&path)]).unwrap();
    let document = &package.documents()[0];
    assert_eq!(document.file_name, "report.txt");
    assert_eq!(document.document_id.as_str(), "gCloud_1700000000_42");
    assert_eq!(document.subject, "gCloud_1700000000_42 - (0)");
    assert_eq!(document.size_bytes, 9);
}

#[test]
fn explicit_ids_pass_through_and_others_are_generated() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.txt", b"hello");
    let inputs = [
        DocumentInput::new(&path).with_document_id(ID_A),
        DocumentInput::new(&path).with_document_id("too-short"),
    ];

    // Real generator: shape only.
    let package = PackageBuilder::new().build(&inputs).unwrap();
    assert_eq!(package.documents()[0].document_id.as_str(), ID_A);
    let generated = &package.documents()[1].document_id;
    assert!(generated.is_generated(), "{generated}");
    assert!(generated.as_str().starts_with("gCloud_"));
}

#[test]
fn empty_input_produces_no_output() {
    assert!(matches!(
        make_builder().build(&[]),
        Err(PdvError::NoFilesSupplied)
    ));
    assert!(matches!(build_pdv(&[]), Err(PdvError::NoFilesSupplied)));
}

#[test]
fn errors_identify_the_document() {
    let dir = TempDir::new().unwrap();
    let mut inputs = hello_world(&dir);
    inputs.push(DocumentInput::new(dir.path().join("gone.pdf")));
    let err = make_builder().build(&inputs).unwrap_err();
    assert!(matches!(err, PdvError::FileNotFound { index: 2, .. }));
    assert!(err.to_string().contains("gone.pdf"));
}

#[test]
fn unencodable_subject_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let mut inputs = hello_world(&dir);
    inputs[1].subject = Some("control \u{1} char".into());

    let err = make_builder().build(&inputs).unwrap_err();
    match &err {
        PdvError::Serialization(CanonicalizationError::InvalidCharacter { codepoint, .. }) => {
            assert_eq!(*codepoint, 1)
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("U+0001"), "{err}");
}

#[test]
fn profile_is_applied_to_every_record() {
    let dir = TempDir::new().unwrap();
    let mut profile = PreservationProfile::default();
    profile.recipient.name = "Maria".into();
    profile.retention_period = "10 years".into();

    let package = make_builder()
        .with_profile(profile)
        .build(&hello_world(&dir))
        .unwrap();
    let root = parse(package.as_bytes()).unwrap();
    let ipdv = root.child("ipdv").unwrap();
    for record in ipdv.elements_named("documento") {
        let recipient = record.child("destinatario").unwrap();
        assert_eq!(recipient.child("nome").unwrap().text(), "Maria");
    }
    assert_eq!(ipdv.child("store-time").unwrap().text(), "10 years");
}

#[test]
fn lexicographic_canonicalizer_sorts_document_attributes() {
    let dir = TempDir::new().unwrap();
    let package = make_builder()
        .with_canonicalizer(Canonicalizer::new(AttributeOrder::Lexicographic))
        .build(&hello_world(&dir))
        .unwrap();
    let text = String::from_utf8(package.into_bytes()).unwrap();
    assert!(text.starts_with("<pdv><obj-stored><document hash=\""));
}

#[test]
fn special_characters_in_subject_are_escaped() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "a.txt", b"hello");
    let inputs = [DocumentInput::new(&path)
        .with_document_id(ID_A)
        .with_file_name("R&D \"draft\".txt")
        .with_subject("Q1 <draft> & notes")];
    let package = make_builder().build(&inputs).unwrap();
    let text = String::from_utf8(package.as_bytes().to_vec()).unwrap();
    assert!(text.contains("name=\"R&amp;D &quot;draft&quot;.txt\""));
    assert!(text.contains("<oggettodocumento>Q1 &lt;draft&gt; &amp; notes</oggettodocumento>"));

    let root = parse(package.as_bytes()).unwrap();
    let document = root.child("obj-stored").unwrap().child("document").unwrap();
    assert_eq!(document.attribute("name"), Some("R&D \"draft\".txt"));
}
