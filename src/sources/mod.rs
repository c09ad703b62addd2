//! Remote source clients
//!
//! Concrete implementations of the pager/joiner trait seams:
//! [`EntrezClient`] serves as both the search source (esearch JSON) and the
//! detail source (efetch XML); [`IciteClient`] is the metrics source.

mod entrez;
mod icite;

pub use entrez::EntrezClient;
pub use icite::IciteClient;
