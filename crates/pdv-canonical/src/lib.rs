//! Canonical XML primitives for preservation packages (PdV).
//!
//! Everything that participates in hashing lives in this crate: the element
//! tree model, the canonical serializer that turns a tree into stable bytes,
//! the parser that reads those bytes back, and the SHA-256 hex digests used
//! for content and aggregate hashes.
//!
//! ```rust
//! use pdv_canonical::{Canonicalize, Canonicalizer, Element};
//!
//! let tree = Element::new("documento")
//!     .with_attribute("IDDocumento", "ABCDEFGHIJ0123456789")
//!     .with_child(Element::new("datachiusura").with_text("2024-01-01"))
//!     .with_child(Element::new("Embedded"));
//!
//! let bytes = Canonicalizer::default().canonicalize(&tree)?;
//! assert_eq!(
//!     bytes,
//!     br#"<documento IDDocumento="ABCDEFGHIJ0123456789"><datachiusura>2024-01-01</datachiusura><Embedded></Embedded></documento>"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(missing_docs)]

/// Canonical serialization of element trees.
pub mod canonicalizer;
/// SHA-256 hex digests and hash algorithm tags.
pub mod digest;
/// Element tree model.
pub mod element;
/// Parsing XML bytes back into element trees.
pub mod parser;
/// Validation helpers for XML names, characters and digests.
pub mod validation;

pub use canonicalizer::{AttributeOrder, CanonicalizationError, Canonicalize, Canonicalizer};
pub use digest::{sha256_hex, HashAlgorithm, HexDigest};
pub use element::{Attribute, Element, Node};
pub use parser::{parse, ParseError};
pub use validation::ValidationError;
