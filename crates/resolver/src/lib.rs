#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Version and platform resolution for vsixget
//!
//! Turns a partially specified [`ExtensionRef`](vsixget_types::ExtensionRef)
//! into an exact [`ResolvedArtifact`](vsixget_types::ResolvedArtifact) by
//! asking the catalog which variants exist and picking the first one, in
//! catalog order, that satisfies the reference.

mod resolver;
mod select;

pub use resolver::Resolver;
pub use select::select_variant;
