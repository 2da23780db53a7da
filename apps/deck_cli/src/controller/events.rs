//! Commands typed by the viewer.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Next,
    Previous,
    Reload,
    Help,
    Quit,
}

impl UiCommand {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" | ">" => Some(Self::Next),
            "p" | "prev" | "previous" | "<" => Some(Self::Previous),
            "r" | "reload" => Some(Self::Reload),
            "h" | "help" | "?" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Reload => "reload",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

pub const HELP_TEXT: &str = "commands: [n]ext, [p]revious, [r]eload, [h]elp, [q]uit";
