use serde::Deserialize;
use utoipa::ToSchema;

use super::{FieldErrors, Validate};
use crate::model::user::UpdateUserPayload;

/// Profile form. Blank fields are left unchanged on the backend.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateUserForm {
    #[schema(example = "admin@wca.com.br")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Validate for UpdateUserForm {
    type Output = UpdateUserPayload;

    fn validate(self) -> Result<UpdateUserPayload, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = self.email.trim();
        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Email inválido");
        }
        if self.password != self.confirm_password {
            errors.add("confirmPassword", "As senhas não coincidem");
        }
        if email.is_empty() && self.password.is_empty() {
            errors.add("email", "Nada para atualizar");
        }

        errors.finish(UpdateUserPayload {
            email: Some(email.to_string()).filter(|e| !e.is_empty()),
            password: Some(self.password).filter(|p| !p.is_empty()),
        })
    }
}
