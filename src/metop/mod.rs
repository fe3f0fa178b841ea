//! Core METOP-AVHRR/3 product reader module.

pub mod ascii;
pub mod error;
pub mod giadr;
pub mod grh;
pub mod ipr;
pub mod layout;
pub mod navigation;
mod reader;
mod stream;

pub use error::{MetopError, Result};
pub use reader::MetopReader;
