//! Closed sets of style tokens interpreted by the rendering layer.
//!
//! Documents store these as plain strings. Parsing is lenient: an unknown
//! token is logged and replaced by the documented default for that field,
//! so a typo in a content file never breaks a page.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A string token from a closed set
pub trait StyleToken: Sized + Copy {
    /// Token kind, used in log messages
    const KIND: &'static str;

    fn parse(token: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

macro_rules! style_token {
    ($(#[$meta:meta])* $name:ident : $kind:literal { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl StyleToken for $name {
            const KIND: &'static str = $kind;

            fn parse(token: &str) -> Option<Self> {
                match token.trim() {
                    $($token => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                $name::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} token `{}`", $kind, raw))
                })
            }
        }
    };
}

style_token! {
    /// Button fill color
    ButtonColor: "button color" {
        Primary => "primary",
        Secondary => "secondary",
        Accent => "accent",
        White => "white",
        Outline => "outline",
        Dark => "dark",
    }
}

style_token! {
    /// Button label color
    TextColor: "text color" {
        White => "white",
        Primary => "primary",
        Secondary => "secondary",
        Accent => "accent",
        Dark => "dark",
    }
}

style_token! {
    /// Background of a page section, header or footer
    Background: "background" {
        White => "white",
        Gray => "gray",
        Light => "light",
        Primary => "primary",
        Secondary => "secondary",
        Dark => "dark",
        Gradient => "gradient",
        Transparent => "transparent",
    }
}

style_token! {
    /// Text treatment for header and footer
    TextStyle: "text style" {
        Dark => "dark",
        Light => "light",
        Primary => "primary",
    }
}

style_token! {
    /// Header call-to-action button shape
    ButtonStyle: "button style" {
        Solid => "solid",
        Outline => "outline",
        Rounded => "rounded",
        Pill => "pill",
    }
}

style_token! {
    /// CTA banner fill
    BannerStyle: "banner style" {
        Gradient => "gradient",
        Solid => "solid",
        Image => "image",
        Minimal => "minimal",
    }
}

style_token! {
    /// CTA banner arrangement
    BannerLayout: "banner layout" {
        Centered => "centered",
        Split => "split",
        Stacked => "stacked",
    }
}

style_token! {
    /// Overlay drawn over a hero background image
    OverlayType: "overlay type" {
        None => "none",
        Dark => "dark",
        Light => "light",
        Primary => "primary",
        Gradient => "gradient",
        Custom => "custom",
    }
}

style_token! {
    /// Styled hero background used when no image is configured
    HeroBackgroundType: "hero background type" {
        Gradient => "gradient",
        Solid => "solid",
        Image => "image",
    }
}

style_token! {
    /// Whether services share one page or each get their own route
    PageType: "page type" {
        Single => "single",
        Multiple => "multiple",
    }
}

style_token! {
    /// How service cards are illustrated
    DisplayType: "display type" {
        Icons => "icons",
        Images => "images",
    }
}

style_token! {
    LogoSize: "logo size" {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
}

/// Deserialize any JSON value into a token, `None` when it is not a known token
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: StyleToken,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(token)) => {
            let parsed = T::parse(&token);
            if parsed.is_none() && !token.is_empty() {
                tracing::warn!("Unknown {} token `{}`, using default", T::KIND, token);
            }
            parsed
        }
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            tracing::warn!("Expected a {} token, found {}", T::KIND, other);
            None
        }
    })
}

/// `#[serde(with = "tokens::optional")]` for optional token fields
pub mod optional {
    use super::*;

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: StyleToken,
    {
        match value {
            Some(token) => serializer.serialize_str(token.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: StyleToken,
    {
        lenient(deserializer)
    }
}

/// Generates a `with` module for a required token field with a fixed default
macro_rules! token_default {
    ($name:ident : $ty:ident = $default:expr) => {
        pub mod $name {
            use super::*;

            pub fn default() -> $ty {
                $default
            }

            pub fn serialize<S: Serializer>(value: &$ty, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(value.as_str())
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<$ty, D::Error> {
                let parsed: Option<$ty> = lenient(deserializer)?;
                Ok(parsed.unwrap_or_else(default))
            }
        }
    };
}

token_default!(background_white: Background = Background::White);
token_default!(background_gray: Background = Background::Gray);
token_default!(background_dark: Background = Background::Dark);
token_default!(text_style_dark: TextStyle = TextStyle::Dark);
token_default!(text_style_light: TextStyle = TextStyle::Light);
token_default!(button_style_solid: ButtonStyle = ButtonStyle::Solid);
token_default!(banner_style_gradient: BannerStyle = BannerStyle::Gradient);
token_default!(banner_layout_centered: BannerLayout = BannerLayout::Centered);
token_default!(overlay_dark: OverlayType = OverlayType::Dark);
token_default!(hero_background_gradient: HeroBackgroundType = HeroBackgroundType::Gradient);
token_default!(page_type_single: PageType = PageType::Single);
token_default!(display_type_icons: DisplayType = DisplayType::Icons);
token_default!(logo_size_medium: LogoSize = LogoSize::Medium);

/// Read a flag, `None` unless the value is a JSON boolean
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(flag)) => Some(flag),
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            tracing::warn!("Expected a boolean flag, found {}", other);
            None
        }
    })
}

/// Generates a `with` module for a flag that falls back to its polarity
/// when the stored value is `null` or not a boolean
macro_rules! flag_default {
    ($name:ident = $default:expr) => {
        pub mod $name {
            use super::*;

            pub fn default() -> bool {
                $default
            }

            pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bool(*value)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
                Ok(lenient_flag(deserializer)?.unwrap_or($default))
            }
        }
    };
}

// Enabled unless explicitly `false`
flag_default!(unless_false = true);
// Enabled only when explicitly `true`
flag_default!(only_if_true = false);
