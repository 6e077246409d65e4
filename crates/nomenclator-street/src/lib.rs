//! Street-name canonicalization for the street index.
//!
//! Raw street names come in as written in the source data, usually with the
//! street type first and in upper case (`"УЛ. Якуба Коласа"`). The index
//! lists streets by proper name, so [`StreetFormatter`] moves the type (and
//! an ordinal such as `"2-й"`) behind the name and normalizes the case.
//!
//! The set of recognized types is configurable through [`StreetTypes`];
//! [`DEFAULT_STREET_TYPES`] holds the standard abbreviations.

pub use self::{
    formatter::{StreetFormatter, capitalize, is_ordinal},
    types::{DEFAULT_STREET_TYPES, StreetTypes},
};

mod formatter;
pub mod types;
