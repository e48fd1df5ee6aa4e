//! On-call duty roster.
//!
//! Employees are organised in duty groups; each ISO week is assigned a copy of
//! one group. Assignments can be rotated, swapped, covered and overridden, and
//! the result is derived day by day for a month and exported as a printable
//! table or a templated report.

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod persistence;
pub mod roster;
pub mod schedule;
pub mod session;
pub mod telemetry;
