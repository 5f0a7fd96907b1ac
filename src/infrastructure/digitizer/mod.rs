//! Digitization service adapters

mod http;

pub use http::HttpDigitizer;
