pub mod build;
pub mod canonicalize;
pub mod inspect;
pub mod verify;

use pdv_canonical::{AttributeOrder, Canonicalizer};

pub(crate) fn canonicalizer(sorted_attributes: bool) -> Canonicalizer {
    Canonicalizer::new(if sorted_attributes {
        AttributeOrder::Lexicographic
    } else {
        AttributeOrder::Document
    })
}
