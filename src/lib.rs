//! # xlate - Terminal Translation Client
//!
//! `xlate` translates text through Google Cloud Translation, DeepL, Azure AI
//! Translator or LibreTranslate.
//!
//! ## Features
//!
//! - **One-shot translation** of arguments or piped stdin
//! - **Automatic language detection** with a fallback to English
//! - **File translation** in sentence-aligned chunks, written atomically
//! - **History** of recent translations, bounded and stored as JSON
//! - **Interactive mode** with slash commands (`/swap`, `/to ja`, ...)
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate a phrase, detecting the source language
//! xlate -t es "Hello, world"
//!
//! # Translate a file
//! xlate -f notes.md -t de
//!
//! # Pipe text through
//! cat report.txt | xlate -s en -t fr
//!
//! # Interactive session
//! xlate -i
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/xlate/config.json`:
//!
//! ```json
//! {
//!   "provider": "deepl",
//!   "default_source": "auto",
//!   "default_target": "en",
//!   "history_enabled": true,
//!   "max_history": 100
//! }
//! ```
//!
//! API keys are read from `GOOGLE_API_KEY`, `DEEPL_API_KEY`,
//! `AZURE_TRANSLATOR_KEY` or `LIBRETRANSLATE_API_KEY`, then
//! `TRANSLATOR_API_KEY`, then the config file.

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and per-invocation resolution.
pub mod config;

/// Error taxonomy for translation failures.
pub mod error;

/// Chunked file translation.
pub mod file;

/// File system utilities.
pub mod fs;

/// Bounded translation history.
pub mod history;

/// Input reading from files and stdin.
pub mod input;

/// Interactive translation mode.
pub mod interactive;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration, history and cache.
pub mod paths;

/// Translation provider adapters.
pub mod provider;

/// Language catalog, request/result types and the translation pipeline.
pub mod translation;

/// Terminal UI components (spinner, colors, result rendering).
pub mod ui;
