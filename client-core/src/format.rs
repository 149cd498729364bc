//! Formatting and input-normalization utilities shared by the admin
//! surfaces. Pure functions except for [`Debouncer`].

use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Format an amount in Kuwaiti dinar with thousands grouping:
/// `1234.5` -> `"1,234.500 د.ك"`. The dinar subdivides into 1000 fils,
/// so amounts carry three decimal places.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let fils = (amount.abs() * 1000.0).round() as u64;
    let whole = fils / 1000;
    let frac = fils % 1000;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:03} د.ك", sign, grouped, frac)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// Group a Kuwaiti mobile number as `+965 XXXX XXXX` (the backend
/// stores `+965` followed by 8 digits); anything else is returned
/// unchanged.
pub fn format_phone(raw: &str) -> String {
    let normalized = normalize_digits(raw);
    let digits: String = normalized.chars().filter(|c| c.is_ascii_digit()).collect();
    if normalized.trim().starts_with("+965") && digits.len() == 11 {
        format!("+965 {} {}", &digits[3..7], &digits[7..])
    } else {
        raw.to_string()
    }
}

/// Escape text destined for an HTML cell or badge.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Map Eastern-Arabic digits to ASCII so numeric input from Arabic
/// keyboards validates and sorts correctly.
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => {
                char::from_digit(c as u32 - 0x0660, 10).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Trailing-edge debouncer: the action runs only after `delay` of
/// quiescence; every call supersedes the previous pending one. Used to
/// throttle search-as-you-type at 300 ms.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Default search debounce interval.
    pub fn for_search() -> Self {
        Self::new(Duration::from_millis(300))
    }

    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap();
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        }));
    }

    /// Cancel any pending action.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}
