pub mod deck;
pub mod error;
pub mod landmarks;
pub mod options;
pub mod session;
