/*
 * Responsibility
 * - /service 系の request/response DTO (JSON は camelCase)
 * - "isRemove" は response に出さない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{NewService, ServicePatch, ServiceRow};
use crate::validation::{Field, Schema};

// columns are INTEGER
const INT_MAX: i64 = i32::MAX as i64;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub show_time: Option<i32>,
    pub order: i32,
    pub is_public: bool,
}

impl CreateServiceRequest {
    pub fn schema() -> Schema {
        Schema::new()
            .field(Field::string("name").max_len(255).required())
            .field(Field::string("description").allow_empty())
            .field(Field::integer("price").min(0).max(INT_MAX).required())
            .field(Field::integer("showTime").min(0).max(INT_MAX))
            .field(Field::integer("order").min(0).max(INT_MAX).default(0))
            .field(Field::boolean("isPublic").default(true))
    }
}

impl From<CreateServiceRequest> for NewService {
    fn from(req: CreateServiceRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            show_time: req.show_time,
            order: req.order,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub show_time: Option<i32>,
    pub order: Option<i32>,
    pub is_public: Option<bool>,
}

impl UpdateServiceRequest {
    pub fn schema() -> Schema {
        Schema::new()
            .field(Field::string("name").max_len(255))
            .field(Field::string("description").allow_empty())
            .field(Field::integer("price").min(0).max(INT_MAX))
            .field(Field::integer("showTime").min(0).max(INT_MAX))
            .field(Field::integer("order").min(0).max(INT_MAX))
            .field(Field::boolean("isPublic"))
    }
}

impl From<UpdateServiceRequest> for ServicePatch {
    fn from(req: UpdateServiceRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            price: req.price,
            show_time: req.show_time,
            order: req.order,
            is_public: req.is_public,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub show_time: Option<i32>,
    pub order: i32,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for ServiceResponse {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            show_time: row.show_time,
            order: row.order,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceResponse>,
}

#[derive(Debug, Serialize)]
pub struct ServiceEnvelope {
    pub service: ServiceResponse,
}

#[derive(Debug, Serialize)]
pub struct ServiceMutationResponse {
    pub message: &'static str,
    pub service: ServiceResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
