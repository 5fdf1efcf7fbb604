pub mod filter;
pub mod scoring;
