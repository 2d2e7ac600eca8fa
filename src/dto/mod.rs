use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

pub mod event;
pub mod health;
pub mod validation;

/// Calendar date wire format used everywhere the API exchanges dates.
pub const DATE_FORMAT: &'static [BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Human-readable rendering used in notification bodies ("June 01, 2024").
const PRETTY_DATE_FORMAT: &'static [BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day], [year]");

pub(crate) fn format_date(date: Date) -> String {
    date.format(&DATE_FORMAT)
        .unwrap_or_else(|_| "invalid-date".into())
}

pub(crate) fn format_date_pretty(date: Date) -> String {
    date.format(&PRETTY_DATE_FORMAT)
        .unwrap_or_else(|_| "invalid-date".into())
}
