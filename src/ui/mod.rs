//! UI module - contains UI rendering components

pub mod chart;
pub mod components;
