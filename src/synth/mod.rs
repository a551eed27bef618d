//! Heuristic document-to-chatbot synthesis.
//!
//! Used whenever no model output is available or usable. The pipeline is
//! deterministic and never fails on non-empty text: sections and
//! sub-sections fall back to fixed per-document-type names.

mod assemble;
mod content;
mod normalize;
mod sections;
mod subsections;

pub use assemble::synthesize;
pub use normalize::normalize_text;
pub use sections::SECTION_COUNT;
