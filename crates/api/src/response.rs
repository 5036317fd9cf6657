use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use course_domain::entities::Paginated;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty_with_message(message: String) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl<T> From<Paginated<T>> for PaginatedResponse<T> {
    fn from(page: Paginated<T>) -> Self {
        Self {
            total_pages: page.total_pages(),
            items: page.items,
            total: page.total,
            page: page.page,
            page_size: page.limit,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::CREATED, ApiResponse::success(data))
}

pub fn ok_message(message: impl Into<String>) -> impl IntoResponse {
    (StatusCode::OK, ApiResponse::success_empty_with_message(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test_data");

        assert!(response.success);
        assert_eq!(response.data, Some("test_data"));
        assert!(response.message.is_none());
    }

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::success_empty_with_message("done".to_string());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["data"].is_null());
        assert_eq!(json["message"], "done");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_paginated_response_from_domain_page() {
        let page = Paginated {
            items: vec![1, 2],
            total: 12,
            page: 1,
            limit: 5,
        };
        let response = PaginatedResponse::from(page);

        assert_eq!(response.page_size, 5);
        assert_eq!(response.total_pages, 3);
        assert_eq!(response.items, vec![1, 2]);
    }
}
