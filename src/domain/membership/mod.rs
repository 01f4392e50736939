//! Membership tier domain module.
//!
//! Tier configurations declare the levels and prices for a region and
//! area classification; resolution turns a level number into a price.
//!
//! # Module Structure
//!
//! - `area` - AreaClassification (Rural, Urban, Mixed)
//! - `levels` - LevelsSpec declarations
//! - `configuration` - TierConfiguration entity and validation
//! - `resolution` - Level-to-price resolution and price schedules
//! - `errors` - Validation and operation errors

mod area;
mod configuration;
mod errors;
mod levels;
mod resolution;

pub use area::{AreaClassification, UnknownClassification};
pub use configuration::{validate_levels, TierConfiguration, TierKey};
pub use errors::{TierError, TierValidationError};
pub use levels::LevelsSpec;
pub use resolution::{ResolvedPayment, INDIGENT_LEVEL};
