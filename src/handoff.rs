//! Hand-off links
//!
//! Checkout ends by opening the messaging app with the order text pre-filled.

use std::fmt;

/// User agent fragments that mark a handheld device.
const HANDHELD_MARKERS: [&str; 7] = [
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Client platform, which decides the link shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Phones and tablets open the app through `wa.me`.
    Handheld,

    /// Desktop browsers use WhatsApp Web.
    Desktop,
}

impl Platform {
    /// Classify a user agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let user_agent = user_agent.to_ascii_lowercase();

        if HANDHELD_MARKERS
            .iter()
            .any(|marker| user_agent.contains(marker))
        {
            Self::Handheld
        } else {
            Self::Desktop
        }
    }
}

/// Link to the external messaging endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOffLink {
    url: String,
    platform: Platform,
}

impl HandOffLink {
    /// Compose a link sending `text` to `phone`.
    ///
    /// Every non-digit is removed from `phone`.
    pub fn new(phone: &str, text: &str, platform: Platform) -> Self {
        let phone = digits_only(phone);
        let encoded = urlencoding::encode(text);

        let url = match platform {
            Platform::Handheld => format!("https://wa.me/{phone}?text={encoded}"),
            Platform::Desktop => {
                format!("https://web.whatsapp.com/send?phone={phone}&text={encoded}")
            }
        };

        Self { url, platform }
    }

    /// Full URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Platform the link was composed for.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

impl fmt::Display for HandOffLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn digits_only(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}
