// ABOUTME: Gym, equipment, and exercise-pool store operations
// ABOUTME: Handles gym CRUD, the ordered cascade delete, and per-gym configuration rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use super::SqliteStore;
use crate::models::{Equipment, ExercisePoolEntry, Gym};
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

impl SqliteStore {
    /// Create gym, equipment, and exercise-pool tables
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub(super) async fn migrate_gyms(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS gyms (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS gym_equipment (
                gym_id TEXT NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
                equipment_type TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (gym_id, equipment_type)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS gym_exercise_pool (
                gym_id TEXT NOT NULL REFERENCES gyms(id) ON DELETE CASCADE,
                exercise_id TEXT NOT NULL,
                PRIMARY KEY (gym_id, exercise_id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_gyms_owner ON gyms(owner_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new gym row
    pub(super) async fn insert_gym_row(&self, gym: &Gym) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO gyms (id, owner_id, name, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(gym.id.to_string())
        .bind(gym.owner_id.to_string())
        .bind(&gym.name)
        .bind(gym.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a gym by ID
    pub(super) async fn fetch_gym(&self, gym_id: Uuid) -> Result<Option<Gym>> {
        let row = sqlx::query(
            r"
            SELECT id, owner_id, name, created_at
            FROM gyms WHERE id = $1
            ",
        )
        .bind(gym_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_gym(&row)).transpose()
    }

    /// List a user's gyms ordered by creation time ascending
    pub(super) async fn fetch_gyms_for_owner(&self, owner_id: Uuid) -> Result<Vec<Gym>> {
        let rows = sqlx::query(
            r"
            SELECT id, owner_id, name, created_at
            FROM gyms WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_gym).collect()
    }

    /// Count gyms owned by a user
    pub(super) async fn count_gyms_for_owner(&self, owner_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM gyms WHERE owner_id = $1")
            .bind(owner_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Update a gym's display name
    pub(super) async fn update_gym_name(&self, gym_id: Uuid, name: &str) -> Result<()> {
        sqlx::query("UPDATE gyms SET name = $2 WHERE id = $1")
            .bind(gym_id.to_string())
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a gym and every dependent row in one transaction
    ///
    /// Cascade order: equipment, pool entries, plan exercises of the gym's
    /// plans, the plans themselves, then the gym row.
    pub(super) async fn delete_gym_cascade(&self, gym_id: Uuid) -> Result<()> {
        let id = gym_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM gym_equipment WHERE gym_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM gym_exercise_pool WHERE gym_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            DELETE FROM plan_exercises
            WHERE plan_id IN (SELECT id FROM workout_plans WHERE gym_id = $1)
            ",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM workout_plans WHERE gym_id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM gyms WHERE id = $1")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Insert equipment rows, replacing quantities on repeated types
    pub(super) async fn insert_equipment_rows(&self, items: &[Equipment]) -> Result<()> {
        for item in items {
            sqlx::query(
                r"
                INSERT INTO gym_equipment (gym_id, equipment_type, quantity)
                VALUES ($1, $2, $3)
                ON CONFLICT (gym_id, equipment_type)
                DO UPDATE SET quantity = excluded.quantity
                ",
            )
            .bind(item.gym_id.to_string())
            .bind(&item.equipment_type)
            .bind(item.quantity)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// List equipment configured for a gym
    pub(super) async fn fetch_equipment(&self, gym_id: Uuid) -> Result<Vec<Equipment>> {
        let rows = sqlx::query(
            r"
            SELECT gym_id, equipment_type, quantity
            FROM gym_equipment WHERE gym_id = $1
            ORDER BY equipment_type ASC
            ",
        )
        .bind(gym_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_equipment).collect()
    }

    /// Whether a gym has any equipment row
    pub(super) async fn any_equipment(&self, gym_id: Uuid) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gym_equipment WHERE gym_id = $1")
                .bind(gym_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Insert pool entries; duplicate selections are no-ops
    pub(super) async fn insert_pool_rows(&self, entries: &[ExercisePoolEntry]) -> Result<()> {
        for entry in entries {
            sqlx::query(
                r"
                INSERT INTO gym_exercise_pool (gym_id, exercise_id)
                VALUES ($1, $2)
                ON CONFLICT (gym_id, exercise_id) DO NOTHING
                ",
            )
            .bind(entry.gym_id.to_string())
            .bind(entry.exercise_id.to_string())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// List the exercise pool selected for a gym
    pub(super) async fn fetch_exercise_pool(&self, gym_id: Uuid) -> Result<Vec<ExercisePoolEntry>> {
        let rows = sqlx::query(
            r"
            SELECT gym_id, exercise_id
            FROM gym_exercise_pool WHERE gym_id = $1
            ",
        )
        .bind(gym_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_pool_entry).collect()
    }

    /// Whether a gym has any exercise pool entry
    pub(super) async fn any_pool_entries(&self, gym_id: Uuid) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM gym_exercise_pool WHERE gym_id = $1")
                .bind(gym_id.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Convert a database row to a Gym struct
    fn row_to_gym(row: &sqlx::sqlite::SqliteRow) -> Result<Gym> {
        let id: String = row.get("id");
        let owner_id: String = row.get("owner_id");
        let name: String = row.get("name");
        let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

        Ok(Gym {
            id: Uuid::parse_str(&id)?,
            owner_id: Uuid::parse_str(&owner_id)?,
            name,
            created_at,
        })
    }

    /// Convert a database row to an Equipment struct
    fn row_to_equipment(row: &sqlx::sqlite::SqliteRow) -> Result<Equipment> {
        let gym_id: String = row.get("gym_id");
        let equipment_type: String = row.get("equipment_type");
        let quantity: u32 = row.get("quantity");

        Ok(Equipment {
            gym_id: Uuid::parse_str(&gym_id)?,
            equipment_type,
            quantity,
        })
    }

    /// Convert a database row to an `ExercisePoolEntry` struct
    fn row_to_pool_entry(row: &sqlx::sqlite::SqliteRow) -> Result<ExercisePoolEntry> {
        let gym_id: String = row.get("gym_id");
        let exercise_id: String = row.get("exercise_id");

        Ok(ExercisePoolEntry {
            gym_id: Uuid::parse_str(&gym_id)?,
            exercise_id: Uuid::parse_str(&exercise_id)?,
        })
    }
}
