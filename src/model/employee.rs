use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::filial::FilialRef;
use crate::model::payroll::Payroll;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 7,
        "documentId": "k2v9x0e1",
        "name": "João Da Silva",
        "responsibility": "Vigilante",
        "scale": "12x36",
        "shift": "Diurno",
        "startDate": "2023-02-01",
        "endDate": null,
        "salary": 2500.0,
        "VC": 0.0,
        "VT": 8.8,
        "VR": 25.0,
        "VA": 300.0,
        "filial": { "id": 2, "documentId": "f8a1", "name": "Centro" },
        "payrolls": []
    })
)]
pub struct Employee {
    pub id: u64,
    pub document_id: String,
    pub name: String,
    pub responsibility: Option<String>,
    pub scale: Option<String>,
    pub shift: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub salary: Option<f64>,

    /// Fuel voucher rate, per day.
    #[serde(rename = "VC")]
    pub vc: Option<f64>,
    /// Transport voucher rate, per day.
    #[serde(rename = "VT")]
    pub vt: Option<f64>,
    /// Meal voucher rate, per day.
    #[serde(rename = "VR")]
    pub vr: Option<f64>,
    /// Food voucher rate, per month.
    #[serde(rename = "VA")]
    pub va: Option<f64>,

    pub filial: Option<FilialRef>,

    /// Only present when the backend populated the relation. The
    /// period-filtered endpoint returns at most one entry.
    pub payrolls: Option<Vec<Payroll>>,
}

impl Employee {
    pub fn first_payroll(&self) -> Option<&Payroll> {
        self.payrolls.as_deref().and_then(|p| p.first())
    }

    pub fn has_payroll(&self) -> bool {
        self.first_payroll().is_some()
    }

    pub fn filial_name(&self) -> Option<&str> {
        self.filial.as_ref().map(|f| f.name.as_str())
    }
}

/// Body of employee create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub name: String,
    pub responsibility: String,
    pub scale: String,
    pub shift: String,
    /// Numeric id of the branch.
    pub filial: u64,
    pub start_date: String,
    /// `null` while the employee is active.
    pub end_date: Option<String>,
    pub salary: f64,
    #[serde(rename = "VC")]
    pub vc: f64,
    #[serde(rename = "VT")]
    pub vt: f64,
    #[serde(rename = "VR")]
    pub vr: f64,
    #[serde(rename = "VA")]
    pub va: f64,
}
