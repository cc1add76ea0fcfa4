use crate::database::models::{PayrollFields, PayrollRecord};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Row, Sqlite, sqlite::SqliteRow};
use std::str::FromStr;

fn decimal_column(row: &SqliteRow, column: &str) -> sqlx::Result<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn payroll_from_row(row: &SqliteRow) -> sqlx::Result<PayrollRecord> {
    let history_raw: String = row.try_get("payment_history")?;
    let payment_history =
        serde_json::from_str(&history_raw).map_err(|e| sqlx::Error::ColumnDecode {
            index: "payment_history".to_string(),
            source: Box::new(e),
        })?;

    Ok(PayrollRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        base_salary: decimal_column(row, "base_salary")?,
        allowances: decimal_column(row, "allowances")?,
        deductions: decimal_column(row, "deductions")?,
        overtime: decimal_column(row, "overtime")?,
        vacation_pay: decimal_column(row, "vacation_pay")?,
        payment_history,
        updated_at: row.try_get("updated_at")?,
    })
}

pub async fn find_by_user<'e, E>(db: E, user_id: i64) -> sqlx::Result<Option<PayrollRecord>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row_opt = sqlx::query(
        "SELECT id, user_id, base_salary, allowances, deductions, overtime, vacation_pay,
                payment_history, updated_at
         FROM payroll_records WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    match row_opt {
        Some(row) => Ok(Some(payroll_from_row(&row)?)),
        None => Ok(None),
    }
}

pub async fn upsert<'e, E>(
    db: E,
    user_id: i64,
    fields: &PayrollFields,
    updated_at: DateTime<Utc>,
) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let history = serde_json::to_string(&fields.payment_history)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        "INSERT INTO payroll_records
             (user_id, base_salary, allowances, deductions, overtime, vacation_pay,
              payment_history, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET
             base_salary = excluded.base_salary,
             allowances = excluded.allowances,
             deductions = excluded.deductions,
             overtime = excluded.overtime,
             vacation_pay = excluded.vacation_pay,
             payment_history = excluded.payment_history,
             updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(fields.base_salary.to_string())
    .bind(fields.allowances.to_string())
    .bind(fields.deductions.to_string())
    .bind(fields.overtime.to_string())
    .bind(fields.vacation_pay.to_string())
    .bind(history)
    .bind(updated_at)
    .execute(db)
    .await?;

    Ok(())
}
