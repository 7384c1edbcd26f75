use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::period::parse_backend_date;

/// One monthly payroll record. Monetary totals are computed by the backend;
/// `total_payable` is displayed as received and never recomputed here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: u64,
    pub document_id: String,

    #[serde(rename = "quantityVR")]
    pub quantity_vr: Option<u32>,
    #[serde(rename = "quantityVT")]
    pub quantity_vt: Option<u32>,
    #[serde(rename = "quantityVC")]
    pub quantity_vc: Option<u32>,
    pub quantity_day_work: Option<u32>,

    pub fuel_voucher: Option<f64>,
    pub transportation_voucher: Option<f64>,
    pub meal_voucher: Option<f64>,
    pub food_voucher: Option<f64>,
    pub gratification: Option<f64>,
    pub discount: Option<f64>,
    pub total_payable: Option<f64>,

    #[schema(example = "2024-03-05", nullable = true)]
    pub payment_date: Option<String>,
    /// `None` while unpaid.
    #[schema(example = "2024-03-06", nullable = true)]
    pub paid_at: Option<String>,
}

impl Payroll {
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    pub fn payment_date(&self) -> Option<NaiveDate> {
        self.payment_date.as_deref().and_then(parse_backend_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayrollPayload {
    /// Document id of the employee.
    pub employe: String,
    #[serde(rename = "quantityVR")]
    pub quantity_vr: u32,
    #[serde(rename = "quantityVT")]
    pub quantity_vt: u32,
    #[serde(rename = "quantityVC")]
    pub quantity_vc: u32,
    pub quantity_day_work: u32,
    pub gratification: f64,
    pub discount: f64,
    pub payment_date: Option<String>,
    /// First day of the period, `yyyy-MM-dd`.
    pub created_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayrollPayload {
    #[serde(rename = "quantityVR")]
    pub quantity_vr: u32,
    #[serde(rename = "quantityVT")]
    pub quantity_vt: u32,
    #[serde(rename = "quantityVC")]
    pub quantity_vc: u32,
    pub quantity_day_work: u32,
    pub gratification: f64,
    pub discount: f64,
    pub payment_date: Option<String>,
    /// Only sent when set: an edit may correct the paid date but never
    /// clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidPayload {
    pub paid_at: String,
}
