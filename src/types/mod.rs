//! Core domain types for compendium.
//!
//! - `GameComponent` - one normalized piece of game content
//! - `LicenseInfo` - publisher and license shared across a source
//! - `CampaignEntry` / `CompendiumFile` - the emitted output records

mod component;
mod entry;
mod license;

pub use component::{ComponentKind, GameComponent};
pub use entry::{CampaignEntry, CompendiumFile, LogRecord};
pub use license::LicenseInfo;
