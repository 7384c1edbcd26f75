//! Payment receipts ("demonstrativo de pagamento").
//!
//! [`layout`] turns an employee, their payroll and the period into draw
//! operations; [`render`] turns those into PDF bytes.

use std::path::Path;

use chrono::NaiveTime;
use derive_more::Display;

use crate::model::employee::Employee;
use crate::model::payroll::Payroll;
use crate::model::period::Period;

pub mod layout;
pub mod render;

#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    #[error("failed to build PDF: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// `Recibo_<name>_<MÊS>_<year>.pdf`, whitespace runs in the name
/// replaced by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct ReceiptFileName(String);

impl ReceiptFileName {
    pub fn new(employee_name: &str, period: Period) -> Self {
        let mut name = String::with_capacity(employee_name.len());
        let mut in_space = false;
        for c in employee_name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    name.push('_');
                }
                in_space = true;
            } else {
                name.push(c);
                in_space = false;
            }
        }
        Self(format!("Recibo_{}_{}_{}.pdf", name, period.month.name(), period.year))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct Receipt {
    pub file_name: ReceiptFileName,
    pub pdf: Vec<u8>,
}

/// Reads the logo once per request. A missing or unreadable file is logged
/// and the receipt is produced without it.
pub fn load_logo(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "Receipt logo could not be loaded");
            None
        }
    }
}

pub fn build(
    employee: &Employee,
    payroll: &Payroll,
    period: Period,
    printed_at: NaiveTime,
    logo: Option<&[u8]>,
) -> Result<Receipt, ReceiptError> {
    let file_name = ReceiptFileName::new(&employee.name, period);
    let ops = layout::layout(employee, payroll, period, printed_at);
    let pdf = render::render(file_name.as_str(), &ops, logo)?;
    Ok(Receipt { file_name, pdf })
}
