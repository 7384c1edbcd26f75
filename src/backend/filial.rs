use reqwest::Method;

use super::{Api, ApiError};
use crate::model::filial::{Filial, FilialPayload};
use crate::models::{DataEnvelope, ListEnvelope};

const COLLECTION: &str = "filials";

impl Api<'_> {
    /// All branches with their employees.
    pub async fn list_filiais(&self) -> Result<Vec<Filial>, ApiError> {
        let req = self.request(Method::GET, &format!("{COLLECTION}?populate=employes"));
        let list: ListEnvelope<Filial> = Self::fetch(req).await?;
        Ok(list.data)
    }

    pub async fn create_filial(&self, payload: &FilialPayload) -> Result<(), ApiError> {
        let req = self
            .request(Method::POST, COLLECTION)
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    pub async fn update_filial(
        &self,
        document_id: &str,
        payload: &FilialPayload,
    ) -> Result<(), ApiError> {
        let req = self
            .request(Method::PUT, &format!("{COLLECTION}/{document_id}"))
            .json(&DataEnvelope { data: payload });
        Self::execute(req).await
    }

    pub async fn delete_filial(&self, document_id: &str) -> Result<(), ApiError> {
        Self::execute(self.request(Method::DELETE, &format!("{COLLECTION}/{document_id}"))).await
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::BackendClient;
    use crate::backend::testing::{self, Recorded};
    use crate::model::filial::FilialPayload;
    use actix_web::{HttpRequest, HttpResponse, web};
    use serde_json::json;

    #[actix_web::test]
    async fn writes_are_wrapped_in_data() {
        let recorded = Recorded::default();
        let rec = recorded.clone();
        let base = testing::spawn(move |cfg| {
            let rec = rec.clone();
            cfg.route(
                "/api/filials/{id}",
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
        let payload = FilialPayload { name: "Centro".into() };
        client.session(None).update_filial("f1", &payload).await.unwrap();

        let writes = recorded.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "PUT");
        assert_eq!(writes[0].1, "/api/filials/f1");
        assert_eq!(writes[0].2, json!({ "data": { "name": "Centro" } }));
    }
}
