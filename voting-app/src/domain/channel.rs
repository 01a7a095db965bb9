use serde::{Deserialize, Serialize};

const CHANNEL_BASE_URL: &str = "https://www.youtube.com/";

/// Public info about the video channel the proposals are for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Channel {
    pub fn from_handle(raw: Option<&str>) -> Self {
        let handle = match raw.map(str::trim) {
            Some(h) if !h.is_empty() => h,
            _ => return Self::default(),
        };

        let handle = if handle.starts_with('@') {
            handle.to_string()
        } else {
            format!("@{handle}")
        };

        Self {
            url: Some(format!("{CHANNEL_BASE_URL}{handle}")),
            name: Some(handle),
        }
    }
}
