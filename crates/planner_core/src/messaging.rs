//! Outbound messaging deep links.
//!
//! # Responsibility
//! - Build WhatsApp and batched SMS deep links.
//! - Hand links to the platform URL dispatcher.
//!
//! # Invariants
//! - Message bodies are encoded like `encodeURIComponent`.
//! - No fallback channel is attempted when a scheme is unsupported.

use log::{error, info};
use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static NON_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid non-digit regex"));
static NON_DIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\d+]").expect("valid dial character regex"));

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Messaging app targeted by a deep link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    WhatsApp,
    Sms,
}

impl Display for Channel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WhatsApp => f.write_str("WhatsApp"),
            Self::Sms => f.write_str("SMS"),
        }
    }
}

/// Platform refused or failed to open a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchError {
    pub message: String,
}

impl DispatchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for DispatchError {}

/// Platform URL-dispatch capability.
pub trait UrlDispatcher {
    /// Whether an installed app handles this URL's scheme.
    fn can_open(&self, url: &str) -> bool;
    fn open(&mut self, url: &str) -> Result<(), DispatchError>;
}

/// Percent-encodes `text` for use as a query parameter value.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Digits-only international number for WhatsApp.
///
/// Returns `None` when `phone` has no digits.
pub fn whatsapp_number(phone: &str, country_code: &str) -> Option<String> {
    let digits = NON_DIGIT_RE.replace_all(phone, "");
    if digits.is_empty() {
        return None;
    }
    if digits.starts_with(country_code) {
        Some(digits.into_owned())
    } else {
        Some(format!("{country_code}{digits}"))
    }
}

/// Number as written into an SMS recipient list: digits and `+` only.
pub fn sms_number(phone: &str) -> String {
    NON_DIAL_RE.replace_all(phone, "").into_owned()
}

pub fn whatsapp_link(phone: &str, message: &str, country_code: &str) -> Option<String> {
    let number = whatsapp_number(phone, country_code)?;
    Some(format!(
        "whatsapp://send?phone={number}&text={}",
        encode_component(message)
    ))
}

/// Recipient separator and body marker of a batched `sms:` link.
///
/// Platforms disagree on the batched form, so the host picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsLinkStyle {
    /// `sms:n1;n2?body=...`
    #[default]
    Query,
    /// `sms:n1,n2&body=...`
    Ampersand,
}

impl SmsLinkStyle {
    fn separator(self) -> &'static str {
        match self {
            Self::Query => ";",
            Self::Ampersand => ",",
        }
    }

    fn body_marker(self) -> &'static str {
        match self {
            Self::Query => "?body=",
            Self::Ampersand => "&body=",
        }
    }
}

/// One native SMS composer link addressed to every number.
///
/// `numbers` are expected to be normalized with [`sms_number`]; empty
/// entries are skipped. Returns `None` when no number is left.
pub fn sms_batch_link(numbers: &[String], message: &str, style: SmsLinkStyle) -> Option<String> {
    let numbers = numbers
        .iter()
        .map(String::as_str)
        .filter(|number| !number.is_empty())
        .collect::<Vec<_>>();
    if numbers.is_empty() {
        return None;
    }
    Some(format!(
        "sms:{}{}{}",
        numbers.join(style.separator()),
        style.body_marker(),
        encode_component(message)
    ))
}

/// Messaging app missing or refusing the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingError {
    pub channel: Channel,
    /// `None` when the scheme is unsupported; otherwise the open failure.
    pub detail: Option<String>,
}

impl Display for MessagingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            None => write!(f, "{} is not available on this device", self.channel),
            Some(detail) => write!(f, "could not open {}: {detail}", self.channel),
        }
    }
}

impl Error for MessagingError {}

/// Opens `url` if the platform supports it; no fallback is tried.
pub fn dispatch(
    dispatcher: &mut dyn UrlDispatcher,
    channel: Channel,
    url: &str,
) -> Result<(), MessagingError> {
    if !dispatcher.can_open(url) {
        error!("event=message_dispatch module=messaging status=error channel={channel} error_code=unsupported_scheme");
        return Err(MessagingError {
            channel,
            detail: None,
        });
    }
    match dispatcher.open(url) {
        Ok(()) => {
            info!("event=message_dispatch module=messaging status=ok channel={channel}");
            Ok(())
        }
        Err(err) => {
            error!("event=message_dispatch module=messaging status=error channel={channel} error_code=open_failed error={err}");
            Err(MessagingError {
                channel,
                detail: Some(err.message),
            })
        }
    }
}
