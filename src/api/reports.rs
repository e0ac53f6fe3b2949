//! Compliance report queries: provident fund, ESIC and tax withholding.
//!
//! Each report projects a reduced column set out of the payslips for one
//! calendar month. The statutory numbers live inside the JSONB document
//! columns, so the projections use `->>` and come back as text; a missing
//! key projects as null rather than an error.

use std::str::FromStr;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::payslip::Department;
use crate::utils::month::month_range;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Filter by department; unrecognized values are ignored
    pub department: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PfRecord {
    #[schema(example = "Asha Verma")]
    pub employee_name: String,
    #[schema(example = "EMP0001")]
    pub employee_id: String,
    #[schema(example = "PF123456", nullable = true)]
    pub pf_number: Option<String>,
    #[schema(example = "1800", nullable = true)]
    pub pf_amount: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EsicRecord {
    #[schema(example = "Asha Verma")]
    pub employee_name: String,
    #[schema(example = "EMP0001")]
    pub employee_id: String,
    #[schema(example = "ESIC7890", nullable = true)]
    pub esic_number: Option<String>,
    #[schema(example = "750", nullable = true)]
    pub esic_amount: Option<String>,
}

#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaxRecord {
    #[schema(example = "Asha Verma")]
    pub employee_name: String,
    #[schema(example = "EMP0001")]
    pub employee_id: String,
    #[schema(example = "ABCDE1234F", nullable = true)]
    pub pan_number: Option<String>,
    #[schema(example = "70000", nullable = true)]
    pub gross_income: Option<String>,
    #[schema(example = "5200", nullable = true)]
    pub tax_deduction: Option<String>,
}

/// Same permissive policy as the payslip listing: an unrecognized
/// department is dropped, not rejected.
fn department_filter(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| Department::from_str(value).is_ok())
}

/// Provident fund records for one month.
#[utoipa::path(
    get,
    path = "/api/pf-records/{month}",
    params(
        ("month" = String, Path, description = "Pay period month, YYYY-MM"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "PF rows for the month, possibly empty", body = [PfRecord]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Reports"
)]
pub async fn pf_records(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let month = path.into_inner();

    let Some((start, end)) = month_range(&month) else {
        return Ok(HttpResponse::Ok().json(Vec::<PfRecord>::new()));
    };

    let mut sql = String::from(
        "SELECT employee_name, employee_id, \
         government_ids->>'pfNumber' AS pf_number, \
         deductions->>'pf' AS pf_amount \
         FROM payslips WHERE timestamp >= $1 AND timestamp < $2",
    );

    let department = department_filter(query.department.as_deref());
    if department.is_some() {
        sql.push_str(" AND department = $3");
    }

    let mut data_query = sqlx::query_as::<_, PfRecord>(&sql).bind(start).bind(end);
    if let Some(department) = department {
        data_query = data_query.bind(department);
    }

    match data_query.fetch_all(pool.get_ref()).await {
        Ok(records) => Ok(HttpResponse::Ok().json(records)),
        Err(e) => {
            error!(error = %e, %month, "Failed to fetch PF records");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// ESIC (health insurance) records for one month.
#[utoipa::path(
    get,
    path = "/api/esic-records/{month}",
    params(
        ("month" = String, Path, description = "Pay period month, YYYY-MM"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "ESIC rows for the month, possibly empty", body = [EsicRecord]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Reports"
)]
pub async fn esic_records(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let month = path.into_inner();

    let Some((start, end)) = month_range(&month) else {
        return Ok(HttpResponse::Ok().json(Vec::<EsicRecord>::new()));
    };

    let mut sql = String::from(
        "SELECT employee_name, employee_id, \
         government_ids->>'esicNumber' AS esic_number, \
         deductions->>'healthInsurance' AS esic_amount \
         FROM payslips WHERE timestamp >= $1 AND timestamp < $2",
    );

    let department = department_filter(query.department.as_deref());
    if department.is_some() {
        sql.push_str(" AND department = $3");
    }

    let mut data_query = sqlx::query_as::<_, EsicRecord>(&sql).bind(start).bind(end);
    if let Some(department) = department {
        data_query = data_query.bind(department);
    }

    match data_query.fetch_all(pool.get_ref()).await {
        Ok(records) => Ok(HttpResponse::Ok().json(records)),
        Err(e) => {
            error!(error = %e, %month, "Failed to fetch ESIC records");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// Tax withholding records (PAN based) for one month.
#[utoipa::path(
    get,
    path = "/api/tax-records/{month}",
    params(
        ("month" = String, Path, description = "Pay period month, YYYY-MM"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Tax rows for the month, possibly empty", body = [TaxRecord]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Reports"
)]
pub async fn tax_records(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    let month = path.into_inner();

    let Some((start, end)) = month_range(&month) else {
        return Ok(HttpResponse::Ok().json(Vec::<TaxRecord>::new()));
    };

    let mut sql = String::from(
        "SELECT employee_name, employee_id, \
         government_ids->>'panNumber' AS pan_number, \
         totals->>'totalEarnings' AS gross_income, \
         deductions->>'incomeTaxDeduction' AS tax_deduction \
         FROM payslips WHERE timestamp >= $1 AND timestamp < $2",
    );

    let department = department_filter(query.department.as_deref());
    if department.is_some() {
        sql.push_str(" AND department = $3");
    }

    let mut data_query = sqlx::query_as::<_, TaxRecord>(&sql).bind(start).bind(end);
    if let Some(department) = department {
        data_query = data_query.bind(department);
    }

    match data_query.fetch_all(pool.get_ref()).await {
        Ok(records) => Ok(HttpResponse::Ok().json(records)),
        Err(e) => {
            error!(error = %e, %month, "Failed to fetch tax records");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_filter_keeps_only_known_departments() {
        assert_eq!(department_filter(Some("IT")), Some("IT"));
        assert_eq!(department_filter(Some("Engineering")), Some("Engineering"));
        assert_eq!(department_filter(Some("Legal")), None);
        assert_eq!(department_filter(Some("")), None);
        assert_eq!(department_filter(None), None);
    }
}
