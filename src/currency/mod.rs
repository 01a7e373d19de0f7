//! Locale-aware rendering of money amounts and dates.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::dates::month_label;
use crate::utils::money::round_display;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            date_format: DateFormatStyle::Medium,
        }
    }
}

impl LocaleConfig {
    /// Separators for a handful of common tags; unknown tags fall back to `en-US` punctuation.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator) = match tag {
            "de-DE" | "es-ES" | "it-IT" | "pt-BR" | "nl-NL" | "id-ID" => (',', '.'),
            "fr-FR" | "pt-PT" | "sv-SE" | "pl-PL" => (',', '\u{202f}'),
            "de-CH" => ('.', '\''),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            date_format: DateFormatStyle::Medium,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
    pub screen_reader_mode: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_display: CurrencyDisplay::Symbol,
            negative_style: NegativeStyle::Sign,
            screen_reader_mode: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    Symbol,
    Code,
    SymbolAndCode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    Short,
    Medium,
    Long,
}

/// Renders amounts for display. Implementations must not fail.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Decimal, code: &CurrencyCode) -> String;
}

/// Default formatter driven by a [`LocaleConfig`] and [`FormatOptions`].
#[derive(Debug, Clone, Default)]
pub struct LocaleFormatter {
    pub locale: LocaleConfig,
    pub options: FormatOptions,
}

impl LocaleFormatter {
    pub fn new(locale: LocaleConfig, options: FormatOptions) -> Self {
        Self { locale, options }
    }

    pub fn for_tag(tag: &str) -> Self {
        Self::new(LocaleConfig::for_tag(tag), FormatOptions::default())
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }
}

impl CurrencyFormatter for LocaleFormatter {
    fn format(&self, amount: Decimal, code: &CurrencyCode) -> String {
        format_currency_value(amount, code, &self.locale, &self.options)
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "INR" => "₹".into(),
        "BRL" => "R$".into(),
        "AUD" => "A$".into(),
        "CAD" => "CA$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let rounded = round_display(value, precision);
    let body = format!("{:.*}", precision as usize, rounded);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part.to_string(), Some(frac_part.to_string())),
        None => (body, None),
    };
    let grouped = insert_grouping(&int_part, locale.grouping_separator);
    match frac_part {
        Some(frac) => format!("{}{}{}", grouped, locale.decimal_separator, frac),
        None => grouped,
    }
}

fn insert_grouping(int_part: &str, separator: char) -> String {
    match int_part.strip_prefix('-') {
        Some(digits) => format!("-{}", group_digits(digits, separator)),
        None => group_digits(int_part, separator),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.chars().count();
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (len - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let precision = minor_units_for(code.as_str());
    let rounded = round_display(amount, precision);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = format_number(locale, rounded.abs(), precision);
    let symbol = symbol_for(code.as_str());

    let with_unit = match options.currency_display {
        CurrencyDisplay::Symbol => format!("{}{}", symbol, digits),
        CurrencyDisplay::Code => format!("{} {}", code.as_str(), digits),
        CurrencyDisplay::SymbolAndCode => format!("{}{} ({})", symbol, digits, code.as_str()),
    };

    if options.screen_reader_mode {
        let words = format!("{} {}", digits, code.as_str());
        return if negative {
            format!("minus {}", words)
        } else {
            words
        };
    }

    match (negative, options.negative_style) {
        (false, _) => with_unit,
        (true, NegativeStyle::Sign) => format!("-{}", with_unit),
        (true, NegativeStyle::Parentheses) => format!("({})", with_unit),
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{:02} {} {}",
            date.day(),
            month_label(date.month()),
            date.year()
        ),
        DateFormatStyle::Long => format!(
            "{}, {} {} {}",
            date.weekday(),
            date.day(),
            month_label(date.month()),
            date.year()
        ),
    }
}
