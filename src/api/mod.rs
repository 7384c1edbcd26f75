use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::model::period::Period;

pub mod dashboard;
pub mod employee;
pub mod filial;
pub mod payroll;

/// Answer to a submission whose twin is still being forwarded.
pub(crate) fn busy() -> AppError {
    AppError::Conflict("Operação já em andamento".into())
}

/// `?month=&year=`; a missing part is taken from the current month.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// 1 to 12
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<Period, AppError> {
        self.resolve_from(Period::current())
    }

    fn resolve_from(&self, current: Period) -> Result<Period, AppError> {
        let month = self.month.unwrap_or(current.month.number());
        let year = self.year.unwrap_or(current.year);
        Period::new(month, year).ok_or_else(|| AppError::BadRequest(format!("Mês inválido: {month}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthRef {
    pub month: u32,
    pub year: i32,
}

impl From<Period> for MonthRef {
    fn from(p: Period) -> Self {
        Self {
            month: p.month.number(),
            year: p.year,
        }
    }
}

/// Period echoed back with listings so the caller can navigate.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodView {
    pub month: u32,
    pub year: i32,
    #[schema(example = "MARÇO 2024")]
    pub label: String,
    pub previous: MonthRef,
    pub next: MonthRef,
}

impl From<Period> for PeriodView {
    fn from(p: Period) -> Self {
        Self {
            month: p.month.number(),
            year: p.year,
            label: p.to_string(),
            previous: p.previous().into(),
            next: p.next().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parts_come_from_current_period() {
        let current = Period::new(5, 2024).unwrap();
        let q = PeriodQuery::default();
        assert_eq!(q.resolve_from(current).unwrap(), current);

        let q = PeriodQuery { month: Some(1), year: None };
        assert_eq!(q.resolve_from(current).unwrap(), Period::new(1, 2024).unwrap());

        let q = PeriodQuery { month: Some(13), year: Some(2024) };
        assert!(matches!(q.resolve_from(current), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn view_carries_navigation() {
        let view = PeriodView::from(Period::new(1, 2024).unwrap());
        assert_eq!(view.label, "JANEIRO 2024");
        assert_eq!(view.previous, MonthRef { month: 12, year: 2023 });
        assert_eq!(view.next, MonthRef { month: 2, year: 2024 });
    }
}
