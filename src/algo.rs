//! The collection of implemented algorithms.

pub mod fista;
