//! Membership Tiers - Tiered payment model for community health insurance
//!
//! Each region prices membership per area classification (Rural, Urban or
//! Mixed) as an ordered list of payment levels. Every paying configuration
//! is paired with a free indigent tier, and payment resolution maps a level
//! number to its amount, splitting Mixed regions into an urban block followed
//! by a rural block.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
