//! # Maily HTML compiler
//!
//! Turns a Maily document into self-contained email HTML: layout tables,
//! inline styles only, `for` nodes expanded against [`Bindings`].
//!
//! ```rust,ignore
//! use maily_compiler_html::{compile, Bindings};
//!
//! let bindings = Bindings::from_json(r#"{"products": [{"name": "Mug"}]}"#)?;
//! let html = compile(&doc, &bindings)?;
//! ```

pub mod bindings;
mod compiler;


pub use bindings::{Bindings, Scope};
pub use compiler::{compile, compile_with_options, CompileError, CompileOptions};
