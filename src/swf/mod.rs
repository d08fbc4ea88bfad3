//! Core SWF parser module

pub mod error;
pub mod models;

mod compression;
mod parser;
mod reader;

pub use error::{Result, SwfError};
pub use models::{
    Compression, DoAbcTag, Header, Rect, Swf, Tag, TAG_CODE_DO_ABC, TAG_CODE_END,
};
pub use parser::Parser;
pub use reader::SwfReader;
