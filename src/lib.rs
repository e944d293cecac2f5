//! This crate provides a small web API over a static water quality dataset.
//! It serves the tabular records, lists distinct states and monitoring
//! locations, compares two locations on a chosen parameter with a
//! secondary-parameter tie-break, proxies free-text prompts to an external
//! generative-language service and assembles narrative PDF reports.
//!
//! The server is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team on top of the
//!   [hyper](https://hyper.rs) HTTP library.
//! * [Serde](serde) performs (de)serialisation of JSON request and response data.
//! * [csv](csv) and [encoding_rs](encoding_rs) read the Latin-1 encoded
//!   source dataset.
//! * [reqwest](reqwest) talks to the external narrative service.
//! * [printpdf](printpdf) renders the narrative reports.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod compare;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod models;
pub mod narrative;
pub mod report;
pub mod server;
pub mod tracing;
pub mod validated_json;
