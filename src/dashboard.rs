//! Dashboard aggregates over the employees of one period.
//!
//! Input rows come from the period-filtered employee listing, so each
//! employee carries at most one payroll. Only the first payroll is read.

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::employee::Employee;

pub const UNLABELED: &str = "Não informado";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub label: String,
    pub count: usize,
    /// Percentage of all employees, 0 when there are none.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_employees: usize,
    pub with_payroll: usize,
    pub paid: usize,
    pub pending: usize,
    pub total_payable: f64,
    pub total_paid: f64,
    pub pending_amount: f64,
    pub total_salary: f64,
    pub paid_percentage: f64,
    pub amount_percentage: f64,
    pub by_filial: Vec<GroupCount>,
    pub by_shift: Vec<GroupCount>,
    pub by_role: Vec<GroupCount>,
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 || !whole.is_finite() {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Counts per label, in order of first appearance.
fn group_by<'a>(
    employees: &'a [Employee],
    label: impl Fn(&'a Employee) -> Option<&'a str>,
) -> Vec<GroupCount> {
    let mut groups: Vec<(String, usize)> = Vec::new();
    for emp in employees {
        let key = label(emp)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(UNLABELED);
        match groups.iter_mut().find(|(l, _)| l == key) {
            Some((_, count)) => *count += 1,
            None => groups.push((key.to_string(), 1)),
        }
    }

    let total = employees.len() as f64;
    groups
        .into_iter()
        .map(|(label, count)| GroupCount {
            label,
            count,
            share: percentage(count as f64, total),
        })
        .collect()
}

impl DashboardMetrics {
    pub fn compute(employees: &[Employee]) -> Self {
        let mut with_payroll = 0;
        let mut paid = 0;
        let mut total_payable = 0.0;
        let mut total_paid = 0.0;
        let mut total_salary = 0.0;

        for emp in employees {
            total_salary += emp.salary.unwrap_or(0.0);

            let Some(payroll) = emp.first_payroll() else {
                continue;
            };
            let amount = payroll.total_payable.unwrap_or(0.0);
            with_payroll += 1;
            total_payable += amount;
            if payroll.is_paid() {
                paid += 1;
                total_paid += amount;
            }
        }

        Self {
            total_employees: employees.len(),
            with_payroll,
            paid,
            pending: with_payroll - paid,
            total_payable,
            total_paid,
            pending_amount: total_payable - total_paid,
            total_salary,
            paid_percentage: percentage(paid as f64, with_payroll as f64),
            amount_percentage: percentage(total_paid, total_payable),
            by_filial: group_by(employees, Employee::filial_name),
            by_shift: group_by(employees, |e| e.shift.as_deref()),
            by_role: group_by(employees, |e| e.responsibility.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee(v: serde_json::Value) -> Employee {
        serde_json::from_value(v).unwrap()
    }

    fn sample() -> Vec<Employee> {
        vec![
            employee(json!({
                "id": 1, "documentId": "a", "name": "Ana",
                "shift": "Diurno", "responsibility": "Vigilante", "salary": 2000.0,
                "filial": { "id": 1, "name": "Centro" },
                "payrolls": [{ "id": 10, "documentId": "p10", "totalPayable": 300.0, "paidAt": "2024-03-05" }]
            })),
            employee(json!({
                "id": 2, "documentId": "b", "name": "Bruno",
                "shift": "Noturno", "responsibility": "Vigilante", "salary": 2500.0,
                "filial": { "id": 2, "name": "Zona Sul" },
                "payrolls": [{ "id": 11, "documentId": "p11", "totalPayable": 100.0, "paidAt": null }]
            })),
            employee(json!({
                "id": 3, "documentId": "c", "name": "Carla",
                "shift": "Diurno", "responsibility": "Porteira",
                "filial": { "id": 1, "name": "Centro" },
                "payrolls": []
            })),
            employee(json!({ "id": 4, "documentId": "d", "name": "Davi" })),
        ]
    }

    #[test]
    fn counts_and_totals() {
        let m = DashboardMetrics::compute(&sample());
        assert_eq!(m.total_employees, 4);
        assert_eq!(m.with_payroll, 2);
        assert_eq!(m.paid, 1);
        assert_eq!(m.pending, 1);
        assert_eq!(m.total_payable, 400.0);
        assert_eq!(m.total_paid, 300.0);
        assert_eq!(m.pending_amount, 100.0);
        assert_eq!(m.total_salary, 4500.0);
        assert_eq!(m.paid_percentage, 50.0);
        assert_eq!(m.amount_percentage, 75.0);
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let m = DashboardMetrics::compute(&sample());
        let filiais: Vec<(&str, usize)> =
            m.by_filial.iter().map(|g| (g.label.as_str(), g.count)).collect();
        assert_eq!(filiais, [("Centro", 2), ("Zona Sul", 1), (UNLABELED, 1)]);
        assert_eq!(m.by_filial[0].share, 50.0);

        let roles: Vec<&str> = m.by_role.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(roles, ["Vigilante", "Porteira", UNLABELED]);
    }

    #[test]
    fn no_payrolls_means_zero_percentages() {
        let rows = vec![employee(json!({ "id": 1, "documentId": "a", "name": "Ana", "payrolls": [] }))];
        let m = DashboardMetrics::compute(&rows);
        assert_eq!(m.with_payroll, 0);
        assert_eq!(m.paid_percentage, 0.0);
        assert_eq!(m.amount_percentage, 0.0);

        let empty = DashboardMetrics::compute(&[]);
        assert_eq!(empty.total_employees, 0);
        assert!(empty.by_shift.is_empty());
        assert!(empty.paid_percentage.is_finite());
    }

    #[test]
    fn zero_total_payable_does_not_divide() {
        let rows = vec![employee(json!({
            "id": 1, "documentId": "a", "name": "Ana",
            "payrolls": [{ "id": 1, "documentId": "p", "totalPayable": 0.0, "paidAt": "2024-01-02" }]
        }))];
        let m = DashboardMetrics::compute(&rows);
        assert_eq!(m.paid_percentage, 100.0);
        assert_eq!(m.amount_percentage, 0.0);
    }

    #[test]
    fn computing_twice_gives_the_same_result() {
        let rows = sample();
        assert_eq!(DashboardMetrics::compute(&rows), DashboardMetrics::compute(&rows));
    }
}
