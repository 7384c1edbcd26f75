use crate::api::dashboard::DashboardView;
use crate::api::payroll::{
    PayrollGroup, PayrollRow, PayrollStatus, PayrollTable, ReceiptEntry, ReceiptManifest,
};
use crate::api::{MonthRef, PeriodView};
use crate::dashboard::{DashboardMetrics, GroupCount};
use crate::forms::employee::EmployeeForm;
use crate::forms::filial::FilialForm;
use crate::forms::payroll::{CreatePayrollForm, EditPayrollForm, MarkAsPaidForm, PayrollFields};
use crate::forms::user::UpdateUserForm;
use crate::model::employee::Employee;
use crate::model::filial::{Filial, FilialEmployee, FilialRef};
use crate::model::payroll::Payroll;
use crate::model::user::User;
use crate::models::LoginReqDto;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folha API",
        version = "1.0.0",
        description = r#"
## Payroll administration

Back office for a security services company: employees, branches (filiais),
monthly payrolls and payment receipts. Records live in a remote REST backend;
this service validates forms, forwards them with the user's token and builds
the PDF receipts.

### 🔹 Key Features
- **Employees**
  - List, create, update and delete, with benefit rates per day
- **Branches**
  - List, create, rename and delete
- **Payroll**
  - Monthly table grouped by branch, generate one payroll, clone last month,
    edit, mark as paid
- **Receipts**
  - One PDF per employee and month, or every receipt of a branch
- **Dashboard**
  - Paid and pending counts and amounts for a month

### 🔐 Security
`POST /auth/login` sets the `token` cookie. Every route under the API prefix
also accepts `Authorization: Bearer <token>`.

### 📦 Response Format
`{ "success": true, "data": ... }` or `{ "success": false, "error": "..." }`.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        crate::auth::handlers::update_me,

        crate::api::dashboard::dashboard,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::filial::list_filiais,
        crate::api::filial::create_filial,
        crate::api::filial::update_filial,
        crate::api::filial::delete_filial,

        crate::api::payroll::list_payrolls,
        crate::api::payroll::create_payroll,
        crate::api::payroll::clone_previous,
        crate::api::payroll::update_payroll,
        crate::api::payroll::mark_paid,
        crate::api::payroll::download_receipt,
        crate::api::payroll::branch_receipts
    ),
    components(
        schemas(
            LoginReqDto,
            User,
            UpdateUserForm,
            Employee,
            EmployeeForm,
            Filial,
            FilialRef,
            FilialEmployee,
            FilialForm,
            Payroll,
            PayrollFields,
            CreatePayrollForm,
            EditPayrollForm,
            MarkAsPaidForm,
            PayrollStatus,
            PayrollRow,
            PayrollGroup,
            PayrollTable,
            ReceiptEntry,
            ReceiptManifest,
            MonthRef,
            PeriodView,
            GroupCount,
            DashboardMetrics,
            DashboardView
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Session and current user"),
        (name = "Dashboard", description = "Monthly metrics"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Filial", description = "Branch management APIs"),
        (name = "Payroll", description = "Payroll and receipt APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/payrolls/{document_id}/paid"));
        assert!(doc.paths.paths.contains_key("/auth/login"));
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("DashboardMetrics"));
        assert!(components.schemas.contains_key("CreatePayrollForm"));
        assert!(components.schemas.contains_key("EditPayrollForm"));
    }
}
