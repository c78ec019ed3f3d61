pub mod client;
pub mod parser;
pub mod stream;
