//! # bucketsweep
//!
//! Keeps object-storage listings free of the placeholder files that hosted
//! storage services create behind the scenes.
//!
//! Supabase Storage (and similar services) represent an "empty folder" by
//! writing a `.emptyFolderPlaceholder` object into it. Those objects, along
//! with other dotfiles and zero-byte stubs, leak into every listing. This
//! crate offers:
//!
//! - **Filtered listings**: [`hygiene::list_files`] hides system files
//! - **Cleanup**: [`hygiene::cleanup_system_files`] deletes them in one bulk request
//! - **Pluggable backends**: Supabase over HTTP, a local directory tree, or an in-memory fake
//! - **CLI as Unix Citizen**: JSON output, pipe-friendly, dry-run before delete

pub mod cli;
pub mod common;
pub mod hygiene;
pub mod storage;
