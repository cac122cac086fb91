// ABOUTME: Workout plan and plan-exercise store operations
// ABOUTME: Handles the two-level plan tree rows and filtered plan queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use super::SqliteStore;
use crate::models::{PlanExercise, PlanFilter, WorkoutPlan};
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

impl SqliteStore {
    /// Create workout-plan and plan-exercise tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_plans(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS workout_plans (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                parent_plan_id TEXT REFERENCES workout_plans(id) ON DELETE CASCADE,
                gym_id TEXT,
                is_main_program BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS plan_exercises (
                id TEXT PRIMARY KEY,
                plan_id TEXT NOT NULL REFERENCES workout_plans(id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL,
                order_index INTEGER NOT NULL,
                is_bonus BOOLEAN NOT NULL DEFAULT 0,
                UNIQUE (plan_id, order_index)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workout_plans_owner ON workout_plans(owner_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_workout_plans_gym ON workout_plans(gym_id)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_workout_plans_parent ON workout_plans(parent_plan_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new workout plan row
    pub(super) async fn insert_plan_row(&self, plan: &WorkoutPlan) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO workout_plans (
                id, owner_id, name, parent_plan_id, gym_id, is_main_program, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(plan.id.to_string())
        .bind(plan.owner_id.to_string())
        .bind(&plan.name)
        .bind(plan.parent_plan_id.as_ref().map(ToString::to_string))
        .bind(plan.gym_id.as_ref().map(ToString::to_string))
        .bind(plan.is_main_program)
        .bind(plan.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a workout plan by ID
    pub(super) async fn fetch_plan(&self, plan_id: Uuid) -> Result<Option<WorkoutPlan>> {
        let row = sqlx::query(
            r"
            SELECT id, owner_id, name, parent_plan_id, gym_id, is_main_program, created_at
            FROM workout_plans WHERE id = $1
            ",
        )
        .bind(plan_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_plan(&row)).transpose()
    }

    /// List workout plans matching the filter, ordered by creation time
    pub(super) async fn fetch_plans(&self, filter: &PlanFilter) -> Result<Vec<WorkoutPlan>> {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(owner_id) = filter.owner_id {
            binds.push(owner_id.to_string());
            conditions.push(format!("owner_id = ${}", binds.len()));
        }
        if let Some(gym_id) = filter.gym_id {
            binds.push(gym_id.to_string());
            conditions.push(format!("gym_id = ${}", binds.len()));
        }
        if let Some(parent_plan_id) = filter.parent_plan_id {
            binds.push(parent_plan_id.to_string());
            conditions.push(format!("parent_plan_id = ${}", binds.len()));
        }
        if let Some(is_main) = filter.is_main_program {
            conditions.push(format!("is_main_program = {}", i32::from(is_main)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r"
            SELECT id, owner_id, name, parent_plan_id, gym_id, is_main_program, created_at
            FROM workout_plans {where_clause}
            ORDER BY created_at ASC, id ASC
            "
        );

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_plan).collect()
    }

    /// Whether any workout plan references the gym
    pub(super) async fn any_plans_for_gym(&self, gym_id: Uuid) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM workout_plans WHERE gym_id = $1")
                .bind(gym_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Insert plan-exercise rows; duplicate positions are no-ops
    pub(super) async fn insert_plan_exercise_rows(
        &self,
        exercises: &[PlanExercise],
    ) -> Result<()> {
        for exercise in exercises {
            sqlx::query(
                r"
                INSERT INTO plan_exercises (id, plan_id, exercise_id, order_index, is_bonus)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (plan_id, order_index) DO NOTHING
                ",
            )
            .bind(exercise.id.to_string())
            .bind(exercise.plan_id.to_string())
            .bind(exercise.exercise_id.to_string())
            .bind(exercise.order_index)
            .bind(exercise.is_bonus)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// List a plan's exercises ordered by position
    pub(super) async fn fetch_plan_exercises(&self, plan_id: Uuid) -> Result<Vec<PlanExercise>> {
        let rows = sqlx::query(
            r"
            SELECT id, plan_id, exercise_id, order_index, is_bonus
            FROM plan_exercises WHERE plan_id = $1
            ORDER BY order_index ASC
            ",
        )
        .bind(plan_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_plan_exercise).collect()
    }

    /// Convert a database row to a `WorkoutPlan` struct
    fn row_to_plan(row: &sqlx::sqlite::SqliteRow) -> Result<WorkoutPlan> {
        let id: String = row.get("id");
        let owner_id: String = row.get("owner_id");
        let name: String = row.get("name");
        let parent_plan_id: Option<String> = row.get("parent_plan_id");
        let gym_id: Option<String> = row.get("gym_id");
        let is_main_program: bool = row.get("is_main_program");
        let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

        Ok(WorkoutPlan {
            id: Uuid::parse_str(&id)?,
            owner_id: Uuid::parse_str(&owner_id)?,
            name,
            parent_plan_id: parent_plan_id.as_deref().map(Uuid::parse_str).transpose()?,
            gym_id: gym_id.as_deref().map(Uuid::parse_str).transpose()?,
            is_main_program,
            created_at,
        })
    }

    /// Convert a database row to a `PlanExercise` struct
    fn row_to_plan_exercise(row: &sqlx::sqlite::SqliteRow) -> Result<PlanExercise> {
        let id: String = row.get("id");
        let plan_id: String = row.get("plan_id");
        let exercise_id: String = row.get("exercise_id");
        let order_index: u32 = row.get("order_index");
        let is_bonus: bool = row.get("is_bonus");

        Ok(PlanExercise {
            id: Uuid::parse_str(&id)?,
            plan_id: Uuid::parse_str(&plan_id)?,
            exercise_id: Uuid::parse_str(&exercise_id)?,
            order_index,
            is_bonus,
        })
    }
}
