/*
 * Responsibility
 * - /user 系の request/response DTO
 * - request の形式チェックは validation::Schema で宣言し、ValidateBody stage が実行する
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::UserRow;
use crate::validation::{Field, Schema};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    pub fn schema() -> Schema {
        Schema::new()
            .field(Field::string("email").email().required())
            .field(Field::string("password").min_len(6).required())
            .field(Field::string("name").min_len(2).max_len(100).required())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn schema() -> Schema {
        Schema::new()
            .field(Field::string("email").email().required())
            .field(Field::string("password").min_len(6).required())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}

/// Body of a successful register / login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserResponse,
}
