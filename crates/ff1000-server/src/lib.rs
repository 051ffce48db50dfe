//! HTTP serving layer for the FF1000 recommendation library.

pub mod gateway;
