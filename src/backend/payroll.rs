use reqwest::Method;

use super::{Api, ApiError};
use crate::model::payroll::{CreatePayrollPayload, MarkPaidPayload, Payroll, UpdatePayrollPayload};
use crate::models::DataEnvelope;

const COLLECTION: &str = "payrolls";

impl Api<'_> {
    pub async fn get_payroll(&self, document_id: &str) -> Result<Payroll, ApiError> {
        let req = self.request(Method::GET, &format!("{COLLECTION}/{document_id}"));
        let envelope: DataEnvelope<Payroll> = Self::fetch(req).await?;
        Ok(envelope.data)
    }

    pub async fn create_payroll(&self, payload: &CreatePayrollPayload) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, COLLECTION)
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    pub async fn update_payroll(
        &self,
        document_id: &str,
        payload: &UpdatePayrollPayload,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("{COLLECTION}/{document_id}"))
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    /// Stamps `paidAt`. Only the one field is sent.
    pub async fn mark_payroll_paid(
        &self,
        document_id: &str,
        payload: &MarkPaidPayload,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("{COLLECTION}/{document_id}"))
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    /// Copies last month's payrolls into the current month. The backend
    /// skips employees that already have a record for the month.
    pub async fn clone_previous_month(&self) -> Result<serde_json::Value, ApiError> {
        Self::fetch(self.request(Method::POST, &format!("{COLLECTION}/create-all"))).await
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::BackendClient;
    use crate::backend::testing::{self, Recorded};
    use crate::model::payroll::MarkPaidPayload;
    use actix_web::{HttpRequest, HttpResponse, web};
    use serde_json::json;

    #[actix_web::test]
    async fn mark_paid_sends_only_paid_at() {
        let recorded = Recorded::default();
        let rec = recorded.clone();
        let base = testing::spawn(move |cfg| {
            let rec = rec.clone();
            cfg.route(
                "/api/payrolls/{id}",
                web::put().to(move |req: HttpRequest, body: web::Bytes| {
                    let rec = rec.clone();
                    async move {
                        rec.push(&req, &body);
                        HttpResponse::Ok().json(json!({ "data": {} }))
                    }
                }),
            );
        });

        let client = BackendClient::new(base);
        let payload = MarkPaidPayload { paid_at: "2024-03-06".into() };
        client.session(None).mark_payroll_paid("p1", &payload).await.unwrap();

        let writes = recorded.writes();
        assert_eq!(writes[0].1, "/api/payrolls/p1");
        assert_eq!(writes[0].2, json!({ "data": { "paidAt": "2024-03-06" } }));
    }

    #[actix_web::test]
    async fn get_unwraps_data() {
        let base = testing::spawn(|cfg| {
            cfg.route(
                "/api/payrolls/{id}",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "data": { "id": 4, "documentId": "p4", "paidAt": "2024-02-10" }
                    }))
                }),
            );
        });

        let client = BackendClient::new(base);
        let payroll = client.session(None).get_payroll("p4").await.unwrap();
        assert_eq!(payroll.id, 4);
        assert!(payroll.is_paid());
    }
}
