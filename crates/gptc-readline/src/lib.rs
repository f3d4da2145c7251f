//! Interactive terminal front-end for gptc.

mod display;
mod helper;
pub mod markdown;
mod prompt;
mod repl;
pub mod theme;

pub use repl::{LineAction, ReplOptions, classify_line, run};
pub use theme::{CodeTheme, ThemeChoice};
