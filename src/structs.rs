use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub mobile_number: String,
    pub pwd_hash: String,
    /// Pending password-reset code, cleared once used.
    pub reset_otp: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// Resource rows are rendered without their owner id; every query that loads
// them is already filtered by it.

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Attendance {
    pub id: i64,
    pub worker_name: String,
    pub attendance_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Seed {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub quality: String,
    pub vendor: String,
    pub vendor_url: Option<String>,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Medicine {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub vendor: String,
    pub vendor_url: Option<String>,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub settled: bool,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct CalendarEvent {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
}
