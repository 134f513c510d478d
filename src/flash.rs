use axum_extra::extract::cookie::{Cookie, PrivateCookieJar};
use std::fmt;

pub const FLASH_COOKIE: &str = "tourley_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlashLevel {
    Success,
    Error,
    #[default]
    Info,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
            FlashLevel::Info => "info",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw {
            "success" => FlashLevel::Success,
            "error" => FlashLevel::Error,
            _ => FlashLevel::Info,
        }
    }
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A one-shot message carried to the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, message)
    }

    fn encode(&self) -> String {
        format!("{}:{}", self.level, self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (level, message) = raw.split_once(':')?;
        Some(Self::new(FlashLevel::parse(level), message))
    }
}

pub fn push(jar: PrivateCookieJar, flash: Flash) -> PrivateCookieJar {
    jar.add(Cookie::build((FLASH_COOKIE, flash.encode())).path("/").http_only(true))
}

/// Reads the pending flash, if any, and clears it from the jar.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Flash>) {
    let flash = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| Flash::decode(cookie.value()));
    match flash {
        Some(flash) => (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(flash)),
        None => (jar, None),
    }
}
