use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::employees::models::{CreateEmployee, Employee, UpdateEmployee};

const EMPLOYEE_COLUMNS: &str =
    "id, maintenance_team_id, first_name, last_name, phone, created_at, updated_at";

/// Service for maintenance team employees
pub struct EmployeeService {
    pool: PgPool,
}

impl EmployeeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateEmployee) -> Result<Employee> {
        let query = format!(
            "INSERT INTO employees (maintenance_team_id, first_name, last_name, phone) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            EMPLOYEE_COLUMNS
        );

        let employee = sqlx::query_as::<_, Employee>(&query)
            .bind(data.maintenance_team_id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create employee: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Added employee {} to team {}",
            employee.id,
            employee.maintenance_team_id
        );
        Ok(employee)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Employee> {
        let query = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get employee: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<Employee>> {
        let query = format!(
            "SELECT {} FROM employees WHERE maintenance_team_id = $1 ORDER BY last_name, first_name",
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(team_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list employees: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn update(&self, id: Uuid, data: &UpdateEmployee) -> Result<Employee> {
        let query = format!(
            "UPDATE employees SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                phone = COALESCE($4, phone), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            EMPLOYEE_COLUMNS
        );

        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update employee: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete employee: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }

        tracing::info!("Employee {} removed", id);
        Ok(())
    }
}
