use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Name shown to clients.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Manager => "gerente",
            Role::Employee => "funcionario",
        }
    }

    /// Accepts the canonical names and the Portuguese ones used by the pages.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "manager" | "gerente" => Some(Role::Manager),
            "employee" | "funcionario" | "funcionário" => Some(Role::Employee),
            _ => None,
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Role::parse(&s).ok_or_else(|| format!("Invalid role: {}", s))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub job_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

pub const DEFAULT_AVATAR: &str = "default-user.png";

#[derive(Debug, Clone, FromRow)]
pub struct ProfileAttributes {
    pub id: i64,
    pub user_id: i64,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub avatar: Option<String>,
}

/// Employee joined with its profile row, for the manager's team view.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeDetails {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// Attendance record with the owner's display name, for reports.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceReportRow {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceState {
    Open,
    Closed,
}

impl AttendanceState {
    /// The state is whatever the most recent record says.
    pub fn from_latest(latest: Option<&AttendanceRecord>) -> Self {
        match latest {
            Some(record) if record.is_open() => AttendanceState::Open,
            _ => AttendanceState::Closed,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub audience: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Feedback {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub viewed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendente" => Some(LeaveStatus::Pending),
            "approved" | "aprovado" => Some(LeaveStatus::Approved),
            "rejected" | "rejeitado" => Some(LeaveStatus::Rejected),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pendente",
            LeaveStatus::Approved => "aprovado",
            LeaveStatus::Rejected => "rejeitado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }
}

impl TryFrom<String> for LeaveStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        LeaveStatus::parse(&s).ok_or_else(|| format!("Invalid leave status: {}", s))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LeaveSubmission {
    pub id: i64,
    pub user_id: i64,
    pub author: String,
    pub reason: String,
    pub file_key: String,
    #[sqlx(try_from = "String")]
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub viewed: bool,
}

#[derive(Debug, Clone)]
pub struct PayrollRecord {
    pub id: i64,
    pub user_id: i64,
    pub base_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub overtime: Decimal,
    pub vacation_pay: Decimal,
    pub payment_history: Vec<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

impl PayrollRecord {
    pub fn net_total(&self) -> Decimal {
        self.base_salary + self.allowances + self.overtime + self.vacation_pay - self.deductions
    }
}

/// Values written by a payroll upsert.
#[derive(Debug, Clone, Default)]
pub struct PayrollFields {
    pub base_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub overtime: Decimal,
    pub vacation_pay: Decimal,
    pub payment_history: Vec<serde_json::Value>,
}
