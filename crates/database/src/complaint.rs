//! Complaint operations.

use rand::Rng;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::department;
use crate::error::{DatabaseError, Result};
use crate::models::{Complaint, ComplaintStats, ComplaintStatus, NewComplaint};

/// How many reference numbers to try before giving up on collisions.
const MAX_REFERENCE_ATTEMPTS: usize = 10;

const COMPLAINT_COLUMNS: &str = "id, reference_number, title, description, transcript, language, \
     translated_text, category, subcategory, department_code, source, status, metadata, \
     created_at, updated_at";

/// Generate a reference number of the form `COMP-NNNNNN`.
pub fn generate_reference_number() -> String {
    format!("COMP-{}", rand::thread_rng().gen_range(100000..=999999))
}

/// Create a complaint with a fresh reference number.
///
/// The department must exist. A reference number collision is retried with a
/// new number.
pub async fn create_complaint(pool: &SqlitePool, complaint: &NewComplaint) -> Result<Complaint> {
    department::get_department(pool, &complaint.department_code).await?;

    let metadata = if complaint.metadata.is_null() {
        "{}".to_string()
    } else {
        serde_json::to_string(&complaint.metadata)?
    };

    for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
        let reference_number = generate_reference_number();

        let result = sqlx::query(
            r#"
            INSERT INTO complaints (
                reference_number, title, description, transcript, language,
                translated_text, category, subcategory, department_code, source,
                status, metadata
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&reference_number)
        .bind(&complaint.title)
        .bind(&complaint.description)
        .bind(&complaint.transcript)
        .bind(&complaint.language)
        .bind(&complaint.translated_text)
        .bind(&complaint.category)
        .bind(&complaint.subcategory)
        .bind(&complaint.department_code)
        .bind(&complaint.source)
        .bind(ComplaintStatus::New.as_str())
        .bind(&metadata)
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                debug!(reference_number = %reference_number, "Complaint created");
                return get_complaint_by_reference(pool, &reference_number).await;
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(attempt, reference_number = %reference_number, "Reference number collision");
            }
            Err(e) => return Err(DatabaseError::Sqlx(e)),
        }
    }

    Err(DatabaseError::AlreadyExists {
        entity: "Complaint reference",
        id: format!("{} attempts exhausted", MAX_REFERENCE_ATTEMPTS),
    })
}

/// Get a complaint by its reference number.
pub async fn get_complaint_by_reference(
    pool: &SqlitePool,
    reference_number: &str,
) -> Result<Complaint> {
    let sql = format!(
        "SELECT {} FROM complaints WHERE reference_number = ?",
        COMPLAINT_COLUMNS
    );
    sqlx::query_as::<_, Complaint>(&sql)
        .bind(reference_number)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Complaint",
            id: reference_number.to_string(),
        })
}

/// List complaints, newest first, optionally filtered by status.
pub async fn list_complaints(
    pool: &SqlitePool,
    status: Option<ComplaintStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Complaint>> {
    let complaints = match status {
        Some(status) => {
            let sql = format!(
                "SELECT {} FROM complaints WHERE status = ? ORDER BY id DESC LIMIT ? OFFSET ?",
                COMPLAINT_COLUMNS
            );
            sqlx::query_as::<_, Complaint>(&sql)
                .bind(status.as_str())
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {} FROM complaints ORDER BY id DESC LIMIT ? OFFSET ?",
                COMPLAINT_COLUMNS
            );
            sqlx::query_as::<_, Complaint>(&sql)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(complaints)
}

/// Move a complaint to a new status.
///
/// Returns `InvalidTransition` when the complaint is already closed.
pub async fn update_complaint_status(
    pool: &SqlitePool,
    reference_number: &str,
    status: ComplaintStatus,
) -> Result<Complaint> {
    let current = get_complaint_by_reference(pool, reference_number).await?;
    let from = current.status()?;

    if !from.can_transition_to(status) {
        return Err(DatabaseError::InvalidTransition {
            from: from.to_string(),
            to: status.to_string(),
        });
    }

    sqlx::query(
        r#"
        UPDATE complaints
        SET status = ?, updated_at = datetime('now')
        WHERE reference_number = ?
        "#,
    )
    .bind(status.as_str())
    .bind(reference_number)
    .execute(pool)
    .await?;

    get_complaint_by_reference(pool, reference_number).await
}

/// Count total complaints.
pub async fn count_complaints(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM complaints
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count complaints grouped by status.
pub async fn count_complaints_by_status(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM complaints
        GROUP BY status
        ORDER BY count DESC, status
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count complaints grouped by department code.
pub async fn count_complaints_by_department(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT department_code, COUNT(*) as count
        FROM complaints
        GROUP BY department_code
        ORDER BY count DESC, department_code
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Totals used by the analytics endpoint.
pub async fn complaint_stats(pool: &SqlitePool) -> Result<ComplaintStats> {
    Ok(ComplaintStats {
        total: count_complaints(pool).await?,
        by_status: count_complaints_by_status(pool).await?,
        by_department: count_complaints_by_department(pool).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_number_format() {
        for _ in 0..100 {
            let reference = generate_reference_number();
            let digits = reference.strip_prefix("COMP-").unwrap();
            assert_eq!(digits.len(), 6);
            let n: u32 = digits.parse().unwrap();
            assert!((100000..=999999).contains(&n));
        }
    }
}
