//! View mode
//!
//! ```text
//! Home  --create_tab-->  Browser
//!   ^                      |
//!   +---- last tab closed -+
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// No tabs, start page visible
    #[default]
    Home,
    /// Tab strip and content frame visible
    Browser,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Home => "home",
            ViewMode::Browser => "browser",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(ViewMode::Home),
            "browser" => Ok(ViewMode::Browser),
            _ => Err(format!("Unknown view mode: {}", s)),
        }
    }
}
