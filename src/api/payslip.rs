use std::str::FromStr;

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::db::StorageError;
use crate::model::payslip::{Department, EmploymentType, Payslip};
use crate::utils::month::month_range;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayslip {
    #[schema(example = "Asha Verma")]
    pub employee_name: String,

    #[schema(example = "EMP0001")]
    pub employee_id: String,

    #[schema(example = "IT")]
    pub department: String,

    #[schema(example = "Full-time")]
    pub employment_type: String,

    #[schema(example = 22)]
    pub working_days: i32,

    #[schema(example = "2022-06-01", value_type = String, format = "date")]
    pub date_of_joining: NaiveDate,

    #[schema(value_type = Object, example = json!({ "accountNumber": "000111222333", "ifscCode": "HDFC0001234" }))]
    pub bank_details: Value,

    #[schema(value_type = Object, example = json!({ "pfNumber": "PF123456", "esicNumber": "ESIC7890", "panNumber": "ABCDE1234F" }))]
    pub government_ids: Value,

    #[schema(value_type = Object, example = json!({ "basic": 50000, "hra": 20000 }))]
    pub earnings: Value,

    #[schema(value_type = Object, example = json!({ "pf": 1800, "healthInsurance": 750, "incomeTaxDeduction": 5200 }))]
    pub deductions: Value,

    #[schema(value_type = Object, example = json!({ "totalEarnings": 70000 }))]
    pub totals: Value,

    #[schema(example = "2024-03-15T00:00:00Z", value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayslipFilter {
    /// Filter by department; unrecognized values are ignored
    pub department: Option<String>,
    /// Filter by employment type; unrecognized values are ignored
    pub employment_type: Option<String>,
}

/// Checks a submission in a fixed order: department, employment type,
/// working days, then timestamp. The first failing rule wins. Name length
/// and document shapes are intentionally left to the storage layer.
fn validate_payslip(payload: &CreatePayslip, now: DateTime<Utc>) -> Result<(), String> {
    if Department::from_str(&payload.department).is_err() {
        return Err(format!(
            "Invalid department. Must be one of: {}",
            Department::allowed_values()
        ));
    }

    if EmploymentType::from_str(&payload.employment_type).is_err() {
        return Err(format!(
            "Invalid employment type. Must be one of: {}",
            EmploymentType::allowed_values()
        ));
    }

    if payload.working_days < 1 || payload.working_days > 31 {
        return Err("Working days must be between 1 and 31".to_string());
    }

    if payload.timestamp > now {
        return Err("Payslip date cannot be in the future".to_string());
    }

    Ok(())
}

/// List payslips, optionally filtered by department and employment type.
#[utoipa::path(
    get,
    path = "/api/payslips",
    params(PayslipFilter),
    responses(
        (status = 200, description = "Payslips ordered newest first", body = [Payslip]),
        (status = 500, description = "Storage failure", body = Object, example = json!({
            "error": "Internal server error"
        }))
    ),
    tag = "Payslips"
)]
pub async fn list_payslips(
    pool: web::Data<PgPool>,
    query: web::Query<PayslipFilter>,
) -> actix_web::Result<impl Responder> {
    // ---------- build WHERE clause dynamically ----------
    // A filter is applied only when its value parses as a member of the
    // fixed enumeration; anything else is silently ignored, matching the
    // documented permissive policy.
    let mut conditions: Vec<String> = Vec::new();
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(department) = query.department.as_deref() {
        if Department::from_str(department).is_ok() {
            conditions.push(format!("department = ${}", bindings.len() + 1));
            bindings.push(department);
        }
    }

    if let Some(employment_type) = query.employment_type.as_deref() {
        if EmploymentType::from_str(employment_type).is_ok() {
            conditions.push(format!("employment_type = ${}", bindings.len() + 1));
            bindings.push(employment_type);
        }
    }

    let mut sql = String::from("SELECT * FROM payslips");
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY timestamp DESC");

    let mut data_query = sqlx::query_as::<_, Payslip>(&sql);
    for value in &bindings {
        data_query = data_query.bind(*value);
    }

    match data_query.fetch_all(pool.get_ref()).await {
        Ok(payslips) => Ok(HttpResponse::Ok().json(payslips)),
        Err(e) => {
            error!(error = %e, sql = %sql, "Failed to fetch payslips");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// Fetch the payslip for one employee in one calendar month.
#[utoipa::path(
    get,
    path = "/api/payslips/{employee_id}/{month}",
    params(
        ("employee_id" = String, Path, description = "Employee identifier"),
        ("month" = String, Path, description = "Pay period month, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Payslip found", body = Payslip),
        (status = 404, description = "No payslip for that employee and month", body = Object, example = json!({
            "error": "Payslip not found"
        })),
        (status = 500, description = "Storage failure")
    ),
    tag = "Payslips"
)]
pub async fn get_payslip(
    pool: web::Data<PgPool>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, month) = path.into_inner();

    // A malformed month simply matches no rows; no input-format validation.
    let Some((start, end)) = month_range(&month) else {
        return Ok(HttpResponse::NotFound().json(json!({
            "error": "Payslip not found"
        })));
    };

    let result = sqlx::query_as::<_, Payslip>(
        "SELECT * FROM payslips WHERE employee_id = $1 AND timestamp >= $2 AND timestamp < $3",
    )
    .bind(&employee_id)
    .bind(start)
    .bind(end)
    .fetch_optional(pool.get_ref())
    .await;

    match result {
        Ok(Some(payslip)) => Ok(HttpResponse::Ok().json(payslip)),
        Ok(None) => Ok(HttpResponse::NotFound().json(json!({
            "error": "Payslip not found"
        }))),
        Err(e) => {
            error!(error = %e, %employee_id, %month, "Failed to fetch payslip");
            Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Internal server error"
            })))
        }
    }
}

/// Create a new payslip.
#[utoipa::path(
    post,
    path = "/api/payslips",
    request_body = CreatePayslip,
    responses(
        (status = 201, description = "Payslip created", body = Payslip),
        (status = 400, description = "Validation failure", body = Object, example = json!({
            "error": "Working days must be between 1 and 31"
        })),
        (status = 409, description = "Duplicate employee + timestamp", body = Object, example = json!({
            "error": "A payslip already exists for this employee and timestamp"
        })),
        (status = 500, description = "Storage failure")
    ),
    tag = "Payslips"
)]
pub async fn create_payslip(
    pool: web::Data<PgPool>,
    payload: web::Json<CreatePayslip>,
) -> actix_web::Result<impl Responder> {
    let payload = payload.into_inner();

    if let Err(message) = validate_payslip(&payload, Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": message })));
    }

    let result = sqlx::query_as::<_, Payslip>(
        r#"
        INSERT INTO payslips (
            employee_name, employee_id, department, employment_type,
            working_days, date_of_joining, bank_details, government_ids,
            earnings, deductions, totals, timestamp
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(&payload.employee_name)
    .bind(&payload.employee_id)
    .bind(&payload.department)
    .bind(&payload.employment_type)
    .bind(payload.working_days)
    .bind(payload.date_of_joining)
    .bind(&payload.bank_details)
    .bind(&payload.government_ids)
    .bind(&payload.earnings)
    .bind(&payload.deductions)
    .bind(&payload.totals)
    .bind(payload.timestamp)
    .fetch_one(pool.get_ref())
    .await;

    match result {
        Ok(payslip) => Ok(HttpResponse::Created().json(payslip)),
        Err(e) => {
            error!(error = %e, employee_id = %payload.employee_id, "Failed to insert payslip");

            let storage_error = StorageError::from(e);
            let mut response = match &storage_error {
                StorageError::Duplicate => HttpResponse::Conflict(),
                StorageError::Constraint => HttpResponse::BadRequest(),
                StorageError::Unavailable | StorageError::Other(_) => {
                    HttpResponse::InternalServerError()
                }
            };

            Ok(response.json(json!({ "error": storage_error.to_string() })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_payload() -> CreatePayslip {
        serde_json::from_value(json!({
            "employeeName": "Asha Verma",
            "employeeId": "EMP0001",
            "department": "IT",
            "employmentType": "Full-time",
            "workingDays": 22,
            "dateOfJoining": "2022-06-01",
            "bankDetails": { "accountNumber": "000111222333", "ifscCode": "HDFC0001234" },
            "governmentIds": { "pfNumber": "PF123456", "esicNumber": "ESIC7890", "panNumber": "ABCDE1234F" },
            "earnings": { "basic": 50000, "hra": 20000 },
            "deductions": { "pf": 1800, "healthInsurance": 750, "incomeTaxDeduction": 5200 },
            "totals": { "totalEarnings": 70000, "totalDeductions": 7750, "netPay": 62250 },
            "timestamp": "2024-03-15T00:00:00Z"
        }))
        .expect("sample payload should deserialize")
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn a_well_formed_payload_passes() {
        assert_eq!(validate_payslip(&sample_payload(), now()), Ok(()));
    }

    #[test]
    fn unknown_department_is_rejected_with_the_allowed_set() {
        let mut payload = sample_payload();
        payload.department = "Legal".into();

        let message = validate_payslip(&payload, now()).unwrap_err();
        assert!(message.starts_with("Invalid department."));
        assert!(message.contains("IT, HR, Finance, Marketing, Sales, Operations, Engineering"));
    }

    #[test]
    fn unknown_employment_type_is_rejected_with_the_allowed_set() {
        let mut payload = sample_payload();
        payload.employment_type = "Freelance".into();

        let message = validate_payslip(&payload, now()).unwrap_err();
        assert!(message.starts_with("Invalid employment type."));
        assert!(message.contains("Full-time, Part-time, Contract, Temporary, Intern"));
    }

    #[test]
    fn working_days_bounds_are_inclusive() {
        let mut payload = sample_payload();

        payload.working_days = 1;
        assert!(validate_payslip(&payload, now()).is_ok());

        payload.working_days = 31;
        assert!(validate_payslip(&payload, now()).is_ok());

        payload.working_days = 0;
        assert_eq!(
            validate_payslip(&payload, now()).unwrap_err(),
            "Working days must be between 1 and 31"
        );

        payload.working_days = 32;
        assert!(validate_payslip(&payload, now()).is_err());
    }

    #[test]
    fn only_strictly_future_timestamps_are_rejected() {
        let mut payload = sample_payload();

        payload.timestamp = now();
        assert!(validate_payslip(&payload, now()).is_ok());

        payload.timestamp = now() + chrono::Duration::seconds(1);
        assert_eq!(
            validate_payslip(&payload, now()).unwrap_err(),
            "Payslip date cannot be in the future"
        );
    }

    #[test]
    fn department_is_checked_before_everything_else() {
        let mut payload = sample_payload();
        payload.department = "Legal".into();
        payload.employment_type = "Freelance".into();
        payload.working_days = 99;
        payload.timestamp = now() + chrono::Duration::days(30);

        let message = validate_payslip(&payload, now()).unwrap_err();
        assert!(message.starts_with("Invalid department."));
    }
}
