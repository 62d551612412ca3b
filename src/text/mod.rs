//! Pure string utilities: text normalization and script classification.

mod normalize;
mod script;

pub use normalize::{decode_entities, normalize};
pub use script::{Script, matches_scripts, word_script};
