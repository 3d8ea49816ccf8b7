pub mod fetch;
pub mod output;
pub mod parser;
pub mod sample;
pub mod scoring;
