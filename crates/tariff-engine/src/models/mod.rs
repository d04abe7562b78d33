//! Charge-model strategy implementations.

// Flat and package pricing
pub mod package;
pub mod standard;

// Tiered pricing
pub mod graduated;
pub mod graduated_percentage;
pub mod prorated_graduated;
pub mod volume;

// Rate-based pricing
pub mod percentage;

// Externally derived pricing
pub mod custom;
pub mod dynamic;
