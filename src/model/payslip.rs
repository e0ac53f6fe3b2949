use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Departments a payslip may be filed under.
///
/// `FromStr` is used for validation: unknown values fail to parse and are
/// either rejected (create) or ignored (list/report filters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Department {
    IT,
    HR,
    Finance,
    Marketing,
    Sales,
    Operations,
    Engineering,
}

impl Department {
    /// Comma-separated allowed set, used in validation messages.
    pub fn allowed_values() -> String {
        Self::iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Employment types; wire form keeps the hyphenated spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum EmploymentType {
    #[strum(serialize = "Full-time")]
    FullTime,
    #[strum(serialize = "Part-time")]
    PartTime,
    Contract,
    Temporary,
    Intern,
}

impl EmploymentType {
    /// Comma-separated allowed set, used in validation messages.
    pub fn allowed_values() -> String {
        Self::iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A persisted payslip row.
///
/// The five document columns (`bank_details`, `government_ids`, `earnings`,
/// `deductions`, `totals`) are schema-less JSONB, stored verbatim. The
/// reporting queries rely on a soft contract: `government_ids` carries
/// `pfNumber` / `esicNumber` / `panNumber`, `deductions` carries `pf` /
/// `healthInsurance` / `incomeTaxDeduction` and `totals` carries
/// `totalEarnings`. Unknown keys are preserved untouched.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
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
    })
)]
pub struct Payslip {
    #[schema(example = 1)]
    pub id: i32,

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

    #[schema(value_type = Object)]
    pub bank_details: Value,

    #[schema(value_type = Object)]
    pub government_ids: Value,

    #[schema(value_type = Object)]
    pub earnings: Value,

    #[schema(value_type = Object)]
    pub deductions: Value,

    #[schema(value_type = Object)]
    pub totals: Value,

    #[schema(example = "2024-03-15T00:00:00Z", value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn department_parses_known_values_case_sensitively() {
        assert_eq!(Department::from_str("IT"), Ok(Department::IT));
        assert_eq!(Department::from_str("Finance"), Ok(Department::Finance));
        assert!(Department::from_str("it").is_err());
        assert!(Department::from_str("Legal").is_err());
    }

    #[test]
    fn employment_type_keeps_hyphenated_wire_form() {
        assert_eq!(
            EmploymentType::from_str("Full-time"),
            Ok(EmploymentType::FullTime)
        );
        assert_eq!(
            EmploymentType::from_str("Part-time"),
            Ok(EmploymentType::PartTime)
        );
        assert_eq!(EmploymentType::FullTime.to_string(), "Full-time");
        assert!(EmploymentType::from_str("Fulltime").is_err());
    }

    #[test]
    fn allowed_value_lists_match_the_fixed_enumerations() {
        assert_eq!(
            Department::allowed_values(),
            "IT, HR, Finance, Marketing, Sales, Operations, Engineering"
        );
        assert_eq!(
            EmploymentType::allowed_values(),
            "Full-time, Part-time, Contract, Temporary, Intern"
        );
    }

    #[test]
    fn payslip_serializes_with_camel_case_keys() {
        let payslip = Payslip {
            id: 7,
            employee_name: "Asha Verma".into(),
            employee_id: "EMP0001".into(),
            department: "IT".into(),
            employment_type: "Full-time".into(),
            working_days: 22,
            date_of_joining: NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(),
            bank_details: serde_json::json!({ "accountNumber": "000111222333" }),
            government_ids: serde_json::json!({ "pfNumber": "PF123456" }),
            earnings: serde_json::json!({ "basic": 50000 }),
            deductions: serde_json::json!({ "pf": 1800 }),
            totals: serde_json::json!({ "totalEarnings": 70000 }),
            timestamp: "2024-03-15T00:00:00Z".parse().unwrap(),
        };

        let value = serde_json::to_value(&payslip).unwrap();
        assert_eq!(value["employeeName"], "Asha Verma");
        assert_eq!(value["employmentType"], "Full-time");
        assert_eq!(value["workingDays"], 22);
        assert_eq!(value["dateOfJoining"], "2022-06-01");
        assert_eq!(value["governmentIds"]["pfNumber"], "PF123456");
        assert!(value.get("employee_name").is_none());
    }
}
