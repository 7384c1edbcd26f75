use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldErrors, Validate, format_date, non_negative, optional_date, required};
use crate::model::payroll::{CreatePayrollPayload, MarkPaidPayload, UpdatePayrollPayload};
use crate::model::period::Period;
use crate::utils::currency::parse_masked_cents;

const MAX_DAYS: i64 = 31;

/// Quantities and amounts shared by the generate and edit forms.
/// `gratification` and `discount` are masked cents.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PayrollFields {
    #[serde(rename = "quantityVR")]
    pub quantity_vr: i64,
    #[serde(rename = "quantityVT")]
    pub quantity_vt: i64,
    #[serde(rename = "quantityVC")]
    pub quantity_vc: i64,
    #[schema(example = 20)]
    pub quantity_day_work: i64,
    #[schema(example = "15000")]
    pub gratification: String,
    #[schema(example = "")]
    pub discount: String,
    #[schema(example = "2024-03-05")]
    pub payment_date: Option<String>,
}

impl Default for PayrollFields {
    fn default() -> Self {
        Self {
            quantity_vr: 0,
            quantity_vt: 0,
            quantity_vc: 0,
            quantity_day_work: 20,
            gratification: String::new(),
            discount: String::new(),
            payment_date: None,
        }
    }
}

struct CheckedFields {
    quantity_vr: u32,
    quantity_vt: u32,
    quantity_vc: u32,
    quantity_day_work: u32,
    gratification: f64,
    discount: f64,
    payment_date: Option<String>,
}

impl PayrollFields {
    fn check(&self, errors: &mut FieldErrors) -> CheckedFields {
        if self.quantity_day_work > MAX_DAYS {
            errors.add("quantityDayWork", "Máximo de 31 dias");
        }
        CheckedFields {
            quantity_vr: non_negative(errors, "quantityVR", self.quantity_vr),
            quantity_vt: non_negative(errors, "quantityVT", self.quantity_vt),
            quantity_vc: non_negative(errors, "quantityVC", self.quantity_vc),
            quantity_day_work: non_negative(errors, "quantityDayWork", self.quantity_day_work),
            gratification: parse_masked_cents(&self.gratification),
            discount: parse_masked_cents(&self.discount),
            payment_date: optional_date(errors, "paymentDate", self.payment_date.as_deref())
                .map(format_date),
        }
    }
}

/// "Gerar folha" for one employee in one period.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatePayrollForm {
    #[schema(example = "k2v9x0e1")]
    pub employee_document_id: String,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = 2024)]
    pub year: i32,
    #[serde(flatten)]
    pub fields: PayrollFields,
}

impl Validate for CreatePayrollForm {
    type Output = (Period, CreatePayrollPayload);

    fn validate(self) -> Result<Self::Output, FieldErrors> {
        let mut errors = FieldErrors::default();
        let employe = required(
            &mut errors,
            "employeeDocumentId",
            &self.employee_document_id,
            "Funcionário é obrigatório",
        );
        let period = Period::new(self.month, self.year);
        if period.is_none() {
            errors.add("month", "Mês inválido");
        }
        let created_date = period.and_then(Period::first_day).map(format_date);
        let checked = self.fields.check(&mut errors);

        let (Some(period), Some(created_date)) = (period, created_date) else {
            return Err(errors);
        };
        errors.finish((
            period,
            CreatePayrollPayload {
                employe,
                quantity_vr: checked.quantity_vr,
                quantity_vt: checked.quantity_vt,
                quantity_vc: checked.quantity_vc,
                quantity_day_work: checked.quantity_day_work,
                gratification: checked.gratification,
                discount: checked.discount,
                payment_date: checked.payment_date,
                created_date,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EditPayrollForm {
    #[serde(flatten)]
    pub fields: PayrollFields,
    /// Corrects the paid date of a paid payroll. Blank leaves it as is.
    pub paid_at: Option<String>,
}

impl Validate for EditPayrollForm {
    type Output = UpdatePayrollPayload;

    fn validate(self) -> Result<UpdatePayrollPayload, FieldErrors> {
        let mut errors = FieldErrors::default();
        let checked = self.fields.check(&mut errors);
        let paid_at = optional_date(&mut errors, "paidAt", self.paid_at.as_deref()).map(format_date);
        errors.finish(UpdatePayrollPayload {
            quantity_vr: checked.quantity_vr,
            quantity_vt: checked.quantity_vt,
            quantity_vc: checked.quantity_vc,
            quantity_day_work: checked.quantity_day_work,
            gratification: checked.gratification,
            discount: checked.discount,
            payment_date: checked.payment_date,
            paid_at,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkAsPaidForm {
    /// Defaults to today.
    #[schema(example = "2024-03-06")]
    pub paid_at: Option<String>,
}

impl MarkAsPaidForm {
    pub fn validate_on(self, today: NaiveDate) -> Result<MarkPaidPayload, FieldErrors> {
        let mut errors = FieldErrors::default();
        let paid_at = optional_date(&mut errors, "paidAt", self.paid_at.as_deref()).unwrap_or(today);
        errors.finish(MarkPaidPayload {
            paid_at: format_date(paid_at),
        })
    }
}

impl Validate for MarkAsPaidForm {
    type Output = MarkPaidPayload;

    fn validate(self) -> Result<MarkPaidPayload, FieldErrors> {
        self.validate_on(Local::now().date_naive())
    }
}
