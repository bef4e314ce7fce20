pub mod quote;
pub mod tokens;
