//! Adapters - Concrete implementations of the ports.

pub mod ai;
pub mod catalog;
pub mod http;
pub mod storage;
