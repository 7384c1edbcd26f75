//! Typed form records.
//!
//! Each form deserializes from the submitted JSON and is checked by
//! [`Validate::validate`] before any backend request is made. Validation
//! either yields the payload to send or the messages per field.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod employee;
pub mod filial;
pub mod payroll;
pub mod user;

pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, FieldErrors>;
}

/// Messages keyed by field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

pub(crate) fn required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, message);
    }
    trimmed.to_string()
}

pub(crate) fn non_negative(errors: &mut FieldErrors, field: &'static str, value: i64) -> u32 {
    match u32::try_from(value) {
        Ok(v) => v,
        Err(_) if value < 0 => {
            errors.add(field, "Deve ser maior ou igual a 0");
            0
        }
        Err(_) => {
            errors.add(field, "Valor muito grande");
            0
        }
    }
}

/// Optional `yyyy-MM-dd` date; blank is `None`.
pub(crate) fn optional_date(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<&str>,
) -> Option<NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(field, "Data inválida");
            None
        }
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_collect_per_field() {
        let mut errors = FieldErrors::default();
        errors.add("name", "a");
        errors.add("name", "b");
        errors.add("shift", "c");
        assert_eq!(errors.get("name").unwrap(), ["a", "b"]);
        assert_eq!(serde_json::to_value(&errors).unwrap()["shift"][0], "c");
        assert!(errors.finish(()).is_err());
        assert_eq!(FieldErrors::default().finish(5), Ok(5));
    }

    #[test]
    fn dates_must_be_iso() {
        let mut errors = FieldErrors::default();
        assert_eq!(optional_date(&mut errors, "d", Some("")), None);
        assert_eq!(optional_date(&mut errors, "d", None), None);
        assert!(errors.is_empty());
        assert_eq!(
            optional_date(&mut errors, "d", Some("2024-03-05")),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(optional_date(&mut errors, "d", Some("05/03/2024")), None);
        assert_eq!(errors.get("d").unwrap(), ["Data inválida"]);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut errors = FieldErrors::default();
        assert_eq!(non_negative(&mut errors, "q", 3), 3);
        assert!(errors.is_empty());
        non_negative(&mut errors, "q", -1);
        assert_eq!(errors.get("q").unwrap(), ["Deve ser maior ou igual a 0"]);
    }
}
