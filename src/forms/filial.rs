use serde::Deserialize;
use utoipa::ToSchema;

use super::{FieldErrors, Validate, required};
use crate::model::filial::FilialPayload;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct FilialForm {
    #[schema(example = "Centro")]
    pub name: String,
}

impl Validate for FilialForm {
    type Output = FilialPayload;

    fn validate(self) -> Result<FilialPayload, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = required(&mut errors, "name", &self.name, "Nome é obrigatório");
        errors.finish(FilialPayload { name })
    }
}
