//! Travel Companion - Multi-domain conversational booking orchestrator.
//!
//! This crate routes each user turn to a domain-specific booking workflow
//! (flights or hotels) and drives it through a slot-filling state machine:
//! collect parameters, search, verify a selection, finalize a booking.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
