use serde::Deserialize;
use utoipa::ToSchema;

use super::{FieldErrors, Validate, format_date, required};
use crate::model::employee::EmployeePayload;
use crate::utils::currency::{parse_decimal_string, parse_masked_cents};

/// Employee create/edit form.
///
/// `salary` is decimal text (`"2500"`, `"2500,50"`). The four benefit rates
/// are masked cents: the digits typed, `"880"` meaning R$ 8,80.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeForm {
    #[schema(example = "João Da Silva")]
    pub name: String,
    #[schema(example = "Vigilante")]
    pub responsibility: String,
    #[schema(example = "12x36")]
    pub scale: String,
    #[schema(example = "Diurno")]
    pub shift: String,
    /// Numeric branch id, as text.
    #[schema(example = "2")]
    pub filial: String,
    #[schema(example = "2024-01-02")]
    pub start_date: String,
    pub end_date: Option<String>,
    #[schema(example = "2500,00")]
    pub salary: String,
    #[serde(rename = "VC")]
    pub vc: Option<String>,
    #[serde(rename = "VT")]
    #[schema(example = "880")]
    pub vt: Option<String>,
    #[serde(rename = "VR")]
    #[schema(example = "2500")]
    pub vr: Option<String>,
    #[serde(rename = "VA")]
    pub va: Option<String>,
}

fn rate(value: Option<&String>) -> f64 {
    value.map(|v| parse_masked_cents(v)).unwrap_or(0.0)
}

impl Validate for EmployeeForm {
    type Output = EmployeePayload;

    fn validate(self) -> Result<EmployeePayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = required(&mut errors, "name", &self.name, "Nome é obrigatório");
        let responsibility = required(
            &mut errors,
            "responsibility",
            &self.responsibility,
            "Cargo é obrigatório",
        );
        let scale = required(&mut errors, "scale", &self.scale, "Escala é obrigatória");
        let shift = required(&mut errors, "shift", &self.shift, "Turno é obrigatório");

        let filial = required(&mut errors, "filial", &self.filial, "Filial é obrigatória");
        let filial_id = if filial.is_empty() {
            0
        } else {
            filial.parse::<u64>().unwrap_or_else(|_| {
                errors.add("filial", "Filial inválida");
                0
            })
        };

        let start = required(
            &mut errors,
            "startDate",
            &self.start_date,
            "Data de início é obrigatória",
        );
        let start_date = if start.is_empty() {
            None
        } else {
            super::optional_date(&mut errors, "startDate", Some(&start))
        };
        let end_date = super::optional_date(&mut errors, "endDate", self.end_date.as_deref());
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.add("endDate", "Data de término anterior ao início");
            }
        }

        let salary_text = required(&mut errors, "salary", &self.salary, "Salário é obrigatório");
        let salary = parse_decimal_string(&salary_text);
        if salary < 0.0 {
            errors.add("salary", "Deve ser maior ou igual a 0");
        }

        let payload = EmployeePayload {
            name,
            responsibility,
            scale,
            shift,
            filial: filial_id,
            start_date: start_date.map(format_date).unwrap_or_default(),
            end_date: end_date.map(format_date),
            salary,
            vc: rate(self.vc.as_ref()),
            vt: rate(self.vt.as_ref()),
            vr: rate(self.vr.as_ref()),
            va: rate(self.va.as_ref()),
        };
        errors.finish(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> EmployeeForm {
        EmployeeForm {
            name: " João Da Silva ".into(),
            responsibility: "Vigilante".into(),
            scale: "12x36".into(),
            shift: "Diurno".into(),
            filial: "2".into(),
            start_date: "2024-01-02".into(),
            end_date: None,
            salary: "2500,50".into(),
            vc: None,
            vt: Some("880".into()),
            vr: Some("2500".into()),
            va: Some("".into()),
        }
    }

    #[test]
    fn valid_form_builds_payload() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.name, "João Da Silva");
        assert_eq!(payload.filial, 2);
        assert_eq!(payload.start_date, "2024-01-02");
        assert_eq!(payload.end_date, None);
        assert_eq!(payload.salary, 2500.5);
        assert_eq!(payload.vc, 0.0);
        assert_eq!(payload.vt, 8.8);
        assert_eq!(payload.vr, 25.0);
        assert_eq!(payload.va, 0.0);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = EmployeeForm::default().validate().unwrap_err();
        for field in ["name", "responsibility", "scale", "shift", "filial", "startDate", "salary"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
        assert!(errors.get("VT").is_none());
    }

    #[test]
    fn branch_must_be_numeric() {
        let mut form = filled();
        form.filial = "centro".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("filial").unwrap(), ["Filial inválida"]);
    }

    #[test]
    fn end_date_cannot_precede_start() {
        let mut form = filled();
        form.end_date = Some("2023-12-31".into());
        let errors = form.validate().unwrap_err();
        assert!(errors.get("endDate").is_some());
    }
}
