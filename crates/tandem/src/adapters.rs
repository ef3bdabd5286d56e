pub mod anthropic;
pub mod base;
pub mod configs;
pub mod factory;
pub mod openai;

#[cfg(test)]
pub mod mock;
