//! Block parser: text files of blank-line-separated numeric sections.
//!
//! Architecture:
//! ```text
//!   data.txt
//!      │
//!      ▼
//!  ┌──────────┐
//!  │  loader  │  split into sections (block mode) or one table (grid mode)
//!  └──────────┘
//!      │
//!      ▼
//!  ┌──────────┐
//!  │  table   │  strip comments, split fields, parse per ParseOptions
//!  └──────────┘
//!      │
//!      ▼
//!  ┌──────────────────────────┐
//!  │ BlockDataset / Grid      │  Vec<NumericBlock>, or [keys, rows, cols]
//!  └──────────────────────────┘
//! ```

pub mod loader;
pub mod model;
pub mod options;
pub mod table;
