//! Market data models
//!
//! - `quote` - quote data structures ([`Quote`])
//! - `profile` - descriptive asset data ([`AssetProfile`])

mod profile;
mod quote;

pub use profile::AssetProfile;
pub use quote::Quote;
