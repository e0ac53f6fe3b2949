use crate::api::payslip::CreatePayslip;
use crate::api::reports::{EsicRecord, PfRecord, TaxRecord};
use crate::model::payslip::Payslip;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payroll API",
        version = "1.0.0",
        description = r#"
## Payroll Record-Keeping Service

Stores monthly payslip records per employee and answers filtered read
queries for compliance reporting.

### Key Features
- **Payslips**
  - Submit a payslip, list payslips by department / employment type,
    look one up by employee and month
- **Compliance Reports**
  - Provident fund (PF), health insurance (ESIC) and tax withholding
    views per month

### Response Format
- JSON-based RESTful responses
- Failures carry an `{ "error": "<message>" }` body

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payslip::list_payslips,
        crate::api::payslip::get_payslip,
        crate::api::payslip::create_payslip,

        crate::api::reports::pf_records,
        crate::api::reports::esic_records,
        crate::api::reports::tax_records
    ),
    components(
        schemas(
            Payslip,
            CreatePayslip,
            PfRecord,
            EsicRecord,
            TaxRecord
        )
    ),
    tags(
        (name = "Payslips", description = "Payslip submission and lookup APIs"),
        (name = "Reports", description = "Monthly compliance report APIs"),
    )
)]
pub struct ApiDoc;
