// ABOUTME: User profile store operations
// ABOUTME: Handles the active-gym pointer and generation-prerequisite fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GymForge

use super::SqliteStore;
use crate::models::{Profile, ProfileUpdate};
use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

impl SqliteStore {
    /// Create the profiles table
    ///
    /// # Errors
    ///
    /// Returns an error if table creation fails
    pub(super) async fn migrate_profiles(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS profiles (
                owner_id TEXT PRIMARY KEY,
                active_gym_id TEXT,
                program_type TEXT CHECK (program_type IN ('ulul', 'ppl')),
                preferred_session_length TEXT
                    CHECK (preferred_session_length IN ('15-30', '30-45', '45-60', '60-90')),
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a user's profile
    pub(super) async fn fetch_profile(&self, owner_id: Uuid) -> Result<Option<Profile>> {
        let row = sqlx::query(
            r"
            SELECT owner_id, active_gym_id, program_type, preferred_session_length
            FROM profiles WHERE owner_id = $1
            ",
        )
        .bind(owner_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::row_to_profile(&row)).transpose()
    }

    /// Create or replace a user's profile
    pub(super) async fn upsert_profile_row(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO profiles (owner_id, active_gym_id, program_type, preferred_session_length)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id) DO UPDATE SET
                active_gym_id = excluded.active_gym_id,
                program_type = excluded.program_type,
                preferred_session_length = excluded.preferred_session_length,
                updated_at = CURRENT_TIMESTAMP
            ",
        )
        .bind(profile.owner_id.to_string())
        .bind(profile.active_gym_id.as_ref().map(ToString::to_string))
        .bind(profile.program_type.as_ref().map(ToString::to_string))
        .bind(profile.preferred_session_length.as_ref().map(ToString::to_string))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Update only the generation-prerequisite fields that are provided
    pub(super) async fn update_profile_generation_fields(
        &self,
        owner_id: Uuid,
        fields: &ProfileUpdate,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE profiles SET
                program_type = COALESCE($2, program_type),
                preferred_session_length = COALESCE($3, preferred_session_length),
                updated_at = CURRENT_TIMESTAMP
            WHERE owner_id = $1
            ",
        )
        .bind(owner_id.to_string())
        .bind(fields.program_type.as_ref().map(ToString::to_string))
        .bind(fields.preferred_session_length.as_ref().map(ToString::to_string))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Point the active-gym pointer at `gym_id`, or clear it
    pub(super) async fn update_active_gym(
        &self,
        owner_id: Uuid,
        gym_id: Option<Uuid>,
    ) -> Result<()> {
        sqlx::query(
            r"
            UPDATE profiles SET
                active_gym_id = $2,
                updated_at = CURRENT_TIMESTAMP
            WHERE owner_id = $1
            ",
        )
        .bind(owner_id.to_string())
        .bind(gym_id.as_ref().map(ToString::to_string))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Convert a database row to a Profile struct
    fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> Result<Profile> {
        let owner_id: String = row.get("owner_id");
        let active_gym_id: Option<String> = row.get("active_gym_id");
        let program_type: Option<String> = row.get("program_type");
        let preferred_session_length: Option<String> = row.get("preferred_session_length");

        Ok(Profile {
            owner_id: Uuid::parse_str(&owner_id)?,
            active_gym_id: active_gym_id.as_deref().map(Uuid::parse_str).transpose()?,
            program_type: program_type.as_deref().map(str::parse).transpose()?,
            preferred_session_length: preferred_session_length
                .as_deref()
                .map(str::parse)
                .transpose()?,
        })
    }
}
