//! vbimport: voicebank archive import engine
//!
//! Installs a UTAU-style voicebank distributed as a zip archive into a normalized,
//! content-addressed directory tree. Legacy voicebanks come with filenames and
//! control files in whatever code page their author's system used, and with
//! paths that may be too long or contain characters the host filesystem rejects.
//! The import turns all of that into a tree of short ASCII names:
//!
//! 1. **Detection** -- All entry names are classified together to pick a single
//!    filename encoding (typically Shift_JIS, GBK or UTF-8)
//! 2. **Routing** -- Each file entry is parsed, copied verbatim, copied under a
//!    hashed name, or dropped, by an ordered rule list
//! 3. **Normalization** -- `oto.ini`, `character.txt` and `prefix.map` are parsed
//!    best-effort and written back as JSON records
//!
//! # Output Layout
//!
//! Every directory segment is replaced by the 8-digit hex CRC-32 of its name:
//!
//! - `<hashed-dir>/_oto.json` -- tone-offset table
//! - `<hashed-dir>/_voicebank.json` -- voicebank metadata
//! - `<hashed-dir>/_prefix_map.json` -- pitch-prefix table
//! - `<hashed-dir>/<original-name>` -- images
//! - `<hashed-dir>/<hashed-stem><suffix>` -- samples (`.wav`) and `_wav.frq` sidecars
//!
//! # Key Modules
//!
//! - [`import`] -- The single-pass orchestrator and import root validation
//! - [`hash`] -- Structure-preserving path hashing
//! - [`encoding`] -- Filename encoding detection and text decoding
//! - [`router`] -- Per-entry routing rules
//! - [`oto`], [`character`], [`prefix`] -- Legacy control file parsers
//! - [`parser`] -- Line tokenizer shared by the parsers
//! - [`writer`] -- JSON records and file copies under the import root
//! - [`archive`] -- Archive access behind the [`archive::ArchiveSource`] trait
//! - [`models`] -- Record types
//! - [`stats`] -- Counters for one pass
//! - [`config`] -- Constants
//!
//! # Example Usage
//!
//! ```bash
//! # Install a voicebank, detecting the filename encoding
//! vbimport install -i teto.zip -o voicebanks/teto
//!
//! # Names in GBK, control files in Shift_JIS
//! vbimport install -i bank.zip -o voicebanks/bank --archive-encoding gbk --text-encoding shift_jis
//! ```

pub mod archive;
pub mod character;
pub mod config;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod import;
pub mod models;
pub mod oto;
pub mod parser;
pub mod prefix;
pub mod router;
pub mod stats;
pub mod writer;

pub use error::{ImportError, ImportResult};
pub use import::{ImportConfig, Importer};
