//! Per-document metadata records.

use crate::document::NormalizedDocument;
use crate::profile::{Party, PreservationProfile};
use chrono::NaiveDate;
use pdv_canonical::Element;

/// Metadata record element name.
pub const RECORD: &str = "documento";
/// Identifier attribute on the record.
pub const RECORD_ID_ATTR: &str = "IDDocumento";

/// Builds the metadata record for one document.
///
/// Layout, in order: `datachiusura` (closure date), `oggettodocumento`
/// (subject), `soggettoproduttore` and `destinatario` (identity blocks from
/// the profile), `MoreInfo` (`mime-type`, `document-class`, `Embedded`).
pub fn build_metadata_record(
    document: &NormalizedDocument,
    closure_date: NaiveDate,
    profile: &PreservationProfile,
) -> Element {
    Element::new(RECORD)
        .with_attribute(RECORD_ID_ATTR, document.document_id.as_str())
        .with_child(
            Element::new("datachiusura").with_text(closure_date.format("%Y-%m-%d").to_string()),
        )
        .with_child(Element::new("oggettodocumento").with_text(&document.subject))
        .with_child(party_element("soggettoproduttore", &profile.producer))
        .with_child(party_element("destinatario", &profile.recipient))
        .with_child(
            Element::new("MoreInfo")
                .with_child(Element::new("mime-type").with_text(&document.mime_type))
                .with_child(Element::new("document-class").with_text(&profile.document_class))
                .with_child(Element::new("Embedded")),
        )
}

fn party_element(tag: &str, party: &Party) -> Element {
    Element::new(tag)
        .with_child(Element::new("nome").with_text(&party.name))
        .with_child(Element::new("cognome").with_text(&party.surname))
        .with_child(Element::new("codicefiscale").with_text(&party.tax_code))
}
