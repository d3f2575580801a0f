//! Terminal emphasis for trace lines.

use colored::Colorize;

/// Emphasis applied to trace line fragments.
///
/// `Terminal` defers to `colored`, which honours `NO_COLOR`, `CLICOLOR` and
/// `CLICOLOR_FORCE`. `Plain` never emits escape sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Styling {
    #[default]
    Terminal,
    Plain,
}

impl Styling {
    pub fn blue(self, text: &str) -> String {
        match self {
            Self::Terminal => text.blue().to_string(),
            Self::Plain => text.to_string(),
        }
    }

    pub fn bold(self, text: &str) -> String {
        match self {
            Self::Terminal => text.bold().to_string(),
            Self::Plain => text.to_string(),
        }
    }
}
