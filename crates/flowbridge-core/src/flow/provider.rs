use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Social networks supported by the login SDK.
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum SocialProvider {
    Amazon,
    Apple,
    Baidu,
    Discord,
    Facebook,
    Github,
    Google,
    Kakao,
    Linkedin,
    Mailru,
    Microsoft,
    Msn,
    Naver,
    Ok,
    Paypal,
    Qq,
    Reddit,
    Steam,
    Twitch,
    Twitter,
    Vimeo,
    Vk,
    Wechat,
    Weibo,
    Xbox,
    Yahoo,
    Yandex,
    Youtube,
}

impl SocialProvider {
    /// Every supported provider.
    pub const ALL: [SocialProvider; 28] = [
        SocialProvider::Amazon,
        SocialProvider::Apple,
        SocialProvider::Baidu,
        SocialProvider::Discord,
        SocialProvider::Facebook,
        SocialProvider::Github,
        SocialProvider::Google,
        SocialProvider::Kakao,
        SocialProvider::Linkedin,
        SocialProvider::Mailru,
        SocialProvider::Microsoft,
        SocialProvider::Msn,
        SocialProvider::Naver,
        SocialProvider::Ok,
        SocialProvider::Paypal,
        SocialProvider::Qq,
        SocialProvider::Reddit,
        SocialProvider::Steam,
        SocialProvider::Twitch,
        SocialProvider::Twitter,
        SocialProvider::Vimeo,
        SocialProvider::Vk,
        SocialProvider::Wechat,
        SocialProvider::Weibo,
        SocialProvider::Xbox,
        SocialProvider::Yahoo,
        SocialProvider::Yandex,
        SocialProvider::Youtube,
    ];

    /// The name the vendor SDK uses for the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            SocialProvider::Amazon => "AMAZON",
            SocialProvider::Apple => "APPLE",
            SocialProvider::Baidu => "BAIDU",
            SocialProvider::Discord => "DISCORD",
            SocialProvider::Facebook => "FACEBOOK",
            SocialProvider::Github => "GITHUB",
            SocialProvider::Google => "GOOGLE",
            SocialProvider::Kakao => "KAKAO",
            SocialProvider::Linkedin => "LINKEDIN",
            SocialProvider::Mailru => "MAILRU",
            SocialProvider::Microsoft => "MICROSOFT",
            SocialProvider::Msn => "MSN",
            SocialProvider::Naver => "NAVER",
            SocialProvider::Ok => "OK",
            SocialProvider::Paypal => "PAYPAL",
            SocialProvider::Qq => "QQ",
            SocialProvider::Reddit => "REDDIT",
            SocialProvider::Steam => "STEAM",
            SocialProvider::Twitch => "TWITCH",
            SocialProvider::Twitter => "TWITTER",
            SocialProvider::Vimeo => "VIMEO",
            SocialProvider::Vk => "VK",
            SocialProvider::Wechat => "WECHAT",
            SocialProvider::Weibo => "WEIBO",
            SocialProvider::Xbox => "XBOX",
            SocialProvider::Yahoo => "YAHOO",
            SocialProvider::Yandex => "YANDEX",
            SocialProvider::Youtube => "YOUTUBE",
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown social provider: {0}")]
pub struct ParseProviderError(pub String);

impl FromStr for SocialProvider {
    type Err = ParseProviderError;

    /// Provider names are matched case-insensitively, the engine side passes them in whatever case
    /// the game developer configured.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        SocialProvider::ALL
            .into_iter()
            .find(|provider| provider.as_str() == upper)
            .ok_or_else(|| ParseProviderError(s.to_string()))
    }
}
