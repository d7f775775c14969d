//! Main module for statblock library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod extraction;
pub mod inlines;
pub mod lexing;
pub mod normalizing;
pub mod pipeline;
pub mod tagging;
pub mod testing;
pub mod text;
pub mod vocabulary;
