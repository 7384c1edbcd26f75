use reqwest::Method;

use super::{Api, ApiError};
use crate::model::employee::{Employee, EmployeePayload};
use crate::model::period::Period;
use crate::models::{DataEnvelope, ListEnvelope};

const COLLECTION: &str = "employes";

impl Api<'_> {
    /// All employees with their branch.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
        let req = self.request(Method::GET, &format!("{COLLECTION}?populate=filial"));
        let list: ListEnvelope<Employee> = Self::fetch(req).await?;
        Ok(list.data)
    }

    /// Employees with at most one payroll each: the one for `period`.
    pub async fn list_employees_with_payrolls(
        &self,
        period: Period,
    ) -> Result<Vec<Employee>, ApiError> {
        let path = format!(
            "{COLLECTION}/with-payrolls?month={}&year={}",
            period.month.number(),
            period.year
        );
        let list: ListEnvelope<Employee> = Self::fetch(self.request(Method::GET, &path)).await?;
        Ok(list.data)
    }

    pub async fn create_employee(&self, payload: &EmployeePayload) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, COLLECTION)
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    pub async fn update_employee(
        &self,
        document_id: &str,
        payload: &EmployeePayload,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("{COLLECTION}/{document_id}"))
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    pub async fn delete_employee(&self, document_id: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, &format!("{COLLECTION}/{document_id}"));
        Self::execute(req).await
    }
}
