use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Branch relation as populated on an employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilialRef {
    pub id: u64,
    pub document_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilialEmployee {
    pub id: u64,
    pub document_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Filial {
    pub id: u64,
    pub document_id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub employes: Vec<FilialEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilialPayload {
    pub name: String,
}
