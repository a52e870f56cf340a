//! Department operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Department, NewDepartment};

/// Create a new department.
pub async fn create_department(pool: &SqlitePool, department: &NewDepartment) -> Result<Department> {
    if let Some(parent) = department.parent_code.as_deref() {
        get_department(pool, parent).await?;
    }

    sqlx::query(
        r#"
        INSERT INTO departments (code, name, parent_code)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&department.code)
    .bind(&department.name)
    .bind(&department.parent_code)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Department",
                    id: department.code.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_department(pool, &department.code).await
}

/// Get a department by code.
pub async fn get_department(pool: &SqlitePool, code: &str) -> Result<Department> {
    sqlx::query_as::<_, Department>(
        r#"
        SELECT code, name, parent_code, created_at
        FROM departments
        WHERE code = ?
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Department",
        id: code.to_string(),
    })
}

/// List all departments.
pub async fn list_departments(pool: &SqlitePool) -> Result<Vec<Department>> {
    let departments = sqlx::query_as::<_, Department>(
        r#"
        SELECT code, name, parent_code, created_at
        FROM departments
        ORDER BY code
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(departments)
}
