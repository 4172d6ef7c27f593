//! Pipeline stages for a rename run.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ backup ──▶ title ──▶ sanitize ──▶ names ──▶ rename ──▶ report
//! (dir)    (copy)     (tiers)   (stem)       (claims)   (fs)       (txt)
//! ```
//!
//! 1. [`scan`]     : validate the directory and list its `*.pdf` files
//! 2. [`backup`]   : refresh the backup subdirectory before anything moves
//! 3. [`title`]    : metadata → layout → plain-text → fallback tiers
//! 4. [`sanitize`] : turn a title into a safe, bounded filename stem
//! 5. [`names`]    : pick a free target name, tracking names claimed this run
//! 6. [`report`]   : the human-readable summary written after the batch

pub mod backup;
pub mod names;
pub mod report;
pub mod sanitize;
pub mod scan;
pub mod title;
