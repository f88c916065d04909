//! Flat in-memory collections of folders and documents.
//!
//! Both stores follow the same mutation contract: an editor builds a
//! proposed collection from the current one and the store replaces itself
//! wholesale.

pub mod document;
pub mod folder;

#[cfg(test)]
mod tests;

pub use document::{Document, DocumentStore};
pub use folder::{Folder, FolderError, FolderStore};
