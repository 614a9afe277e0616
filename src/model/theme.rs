use serde::{Deserialize, Serialize};

const FLAG_IMAGES: [&str; 8] = ["us", "gb", "fr", "de", "jp", "br", "in", "ca"];
const THING_IMAGES: [&str; 8] = [
    "apple", "ball", "car", "dog", "house", "tree", "umbrella", "clock",
];

/// Picture set a Picture-Recall deck is drawn from. The host maps each
/// image key to an asset URL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Flags,
    Things,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Flags
    }
}

impl Theme {
    pub fn all() -> Vec<Theme> {
        vec![Theme::Flags, Theme::Things]
    }

    /// Image keys in their fixed pool order
    pub fn image_keys(&self) -> &'static [&'static str] {
        match self {
            Theme::Flags => &FLAG_IMAGES,
            Theme::Things => &THING_IMAGES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Flags => "flags",
            Theme::Things => "things",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
