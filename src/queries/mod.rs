//! Query modules for the market SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Fetcher`](crate::fetcher::Fetcher) and exposes methods returning
//! `Result<T>` with typed payloads.

pub mod markets;

pub use markets::MarketQuery;
