//! Streaming tree assembly for file-like records.
//!
//! Records flow through an [`assembler::Assembler`], which places each
//! record's metadata into a tree shaped after the record paths and reports
//! completion once every deferred record has been inserted.

#![allow(clippy::enum_variant_names)]
#![allow(clippy::module_inception)]

pub mod application;
pub mod assembler;
pub mod cli;
pub mod config;
pub mod ext;
pub mod record;
pub mod render;
pub mod tree;
