//! Layered defaults resolution for families of related tools.
//!
//! Each component in a family may ship a YAML defaults document; a caller
//! queries by a segmented key path and receives the most specific applicable
//! value after user overrides, per-pair fallback, and environment-variable
//! overrides are accounted for.
//!
//! ## Resolution order
//! For each registered component, most derived first:
//! 1. **User** - `~/.<defaults-file-name>`, a partial override document
//! 2. **System** - the component's shipped defaults document
//! 3. **Environment** - a variable derived from the key path (highest priority)
//!
//! A path absent from one component's schema falls through to the next,
//! more general component. Sub-mappings returned from a query are always
//! schema-complete: partial user overrides are deep-merged over the system
//! sub-tree before being handed out.

pub mod cascade;
pub mod document;
pub mod env;
pub mod error;
pub mod locate;
pub mod merge;
pub mod registry;
pub mod source;

pub use cascade::{Cascade, SourcePair};
pub use error::DefaultsError;
pub use merge::merge_overrides;
pub use registry::{ComponentSpec, Registry};
pub use source::{Content, DefaultsSource, Intermediate};
