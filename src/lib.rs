//! cfgmorph - rule-driven rewriter for network device configuration dumps.
//!
//! This library provides the core functionality for cfgmorph, including:
//! - Rule file parsing and cascade discovery
//! - Segmentation of a dump into interface / managed-object blocks
//! - Rule dispatch by block class and entity name
//! - Line editors: substitution, insertion and deletion
//! - The two-pass rewrite pipeline and atomic output
//!
//! # Example
//!
//! ```no_run
//! use cfgmorph_cli::config::load_merged_config;
//! use cfgmorph_cli::pipeline::{self, io::read_input};
//! use cfgmorph_cli::rules::compile_rules;
//! use std::path::Path;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let rules = compile_rules(&config).unwrap();
//!
//! let dump = read_input(Path::new("running-config.txt")).unwrap();
//! let rewrite = pipeline::run(&dump, &rules, &config.block_classes);
//! print!("{}", rewrite.text);
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod segment;

pub use error::{CfgmorphError, Result};
