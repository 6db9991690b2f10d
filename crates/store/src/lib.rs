//! Store - DOCX packages and output archives
//!
//! This crate opens Word documents as editable XML trees, saves them back
//! without disturbing the parts it does not touch, and bundles generated
//! documents into ZIP archives.

mod archive;
mod error;
pub mod docx;

pub use archive::*;
pub use error::*;

// Re-export DOCX functionality
pub use docx::{
    open_docx, open_docx_bytes, save_docx, docx_to_bytes,
    Document, DocxError, DocxPackage, DocxResult,
};
