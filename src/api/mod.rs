pub mod payslip;
pub mod reports;
