//! One thin method per backend resource/action. Parameter-to-endpoint
//! mapping only; callers own caching, retries, and rendering.
//!
//! Create/update payloads are passed through as JSON values because the
//! admin forms build them dynamically; reads of the core entities are
//! typed.

use client_core::error::ApiError;
use reqwest::Method;
use serde_json::Value;

use crate::client::ApiClient;
use crate::models::{ClientCompany, DashboardStats, Driver, Vehicle};

impl ApiClient {
    // --- drivers ---

    pub async fn drivers(&self) -> Result<Vec<Driver>, ApiError> {
        self.request(Method::GET, "/drivers", None).await
    }

    pub async fn active_drivers(&self) -> Result<Vec<Driver>, ApiError> {
        self.request(Method::GET, "/drivers/active", None).await
    }

    pub async fn driver(&self, id: &str) -> Result<Driver, ApiError> {
        self.request(Method::GET, &format!("/drivers/{}", id), None)
            .await
    }

    pub async fn create_driver(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/drivers", Some(payload)).await
    }

    pub async fn update_driver(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, &format!("/drivers/{}", id), Some(payload))
            .await
    }

    pub async fn delete_driver(&self, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/drivers/{}", id), None)
            .await
    }

    // --- vehicles ---

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.request(Method::GET, "/vehicles", None).await
    }

    pub async fn vehicle(&self, id: &str) -> Result<Vehicle, ApiError> {
        self.request(Method::GET, &format!("/vehicles/{}", id), None)
            .await
    }

    pub async fn create_vehicle(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/vehicles", Some(payload)).await
    }

    pub async fn update_vehicle(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, &format!("/vehicles/{}", id), Some(payload))
            .await
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/vehicles/{}", id), None)
            .await
    }

    // --- clients ---

    pub async fn clients(&self) -> Result<Vec<ClientCompany>, ApiError> {
        self.request(Method::GET, "/clients", None).await
    }

    pub async fn create_client(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/clients", Some(payload)).await
    }

    pub async fn update_client(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, &format!("/clients/{}", id), Some(payload))
            .await
    }

    pub async fn delete_client(&self, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/clients/{}", id), None)
            .await
    }

    // --- orders ---

    pub async fn orders(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/orders", None).await
    }

    pub async fn monthly_orders(&self, year: u16, month: u8) -> Result<Value, ApiError> {
        self.request(
            Method::GET,
            &format!("/orders/monthly?year={}&month={}", year, month),
            None,
        )
        .await
    }

    pub async fn create_order(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/orders", Some(payload)).await
    }

    pub async fn update_order(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, &format!("/orders/{}", id), Some(payload))
            .await
    }

    pub async fn delete_order(&self, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/orders/{}", id), None)
            .await
    }

    // --- advances ---

    pub async fn advances(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/advances", None).await
    }

    pub async fn advances_for_driver(&self, driver_id: &str) -> Result<Value, ApiError> {
        self.request(
            Method::GET,
            &format!("/advances/driver/{}", driver_id),
            None,
        )
        .await
    }

    pub async fn outstanding_advances(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/advances/outstanding", None)
            .await
    }

    pub async fn create_advance(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/advances", Some(payload)).await
    }

    pub async fn update_advance(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::PUT, &format!("/advances/{}", id), Some(payload))
            .await
    }

    pub async fn delete_advance(&self, id: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, &format!("/advances/{}", id), None)
            .await
    }

    // --- payroll ---

    pub async fn calculate_payroll(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/payroll/calculate", Some(payload))
            .await
    }

    pub async fn payroll_runs(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/payroll/runs", None).await
    }

    pub async fn create_payroll_run(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/payroll/runs", Some(payload))
            .await
    }

    pub async fn approve_payroll_run(&self, run_id: &str) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            &format!("/payroll/runs/{}/approve", run_id),
            None,
        )
        .await
    }

    pub async fn process_payroll_deductions(&self, run_id: &str) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            &format!("/payroll/runs/{}/process-deductions", run_id),
            None,
        )
        .await
    }

    pub async fn close_payroll_run(&self, run_id: &str) -> Result<Value, ApiError> {
        self.request(
            Method::POST,
            &format!("/payroll/runs/{}/close", run_id),
            None,
        )
        .await
    }

    pub async fn payroll_for_driver(&self, driver_id: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, &format!("/payroll/driver/{}", driver_id), None)
            .await
    }

    // --- maintenance ---

    pub async fn maintenance_schedules(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/maintenance/schedules", None)
            .await
    }

    pub async fn create_maintenance_schedule(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/maintenance/schedules", Some(payload))
            .await
    }

    pub async fn update_maintenance_schedule(
        &self,
        id: &str,
        payload: Value,
    ) -> Result<Value, ApiError> {
        self.request(
            Method::PUT,
            &format!("/maintenance/schedules/{}", id),
            Some(payload),
        )
        .await
    }

    // --- dashboard / search / commission ---

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.request(Method::GET, "/dashboard/stats", None).await
    }

    pub async fn global_search(&self, query: &str) -> Result<Value, ApiError> {
        self.request(
            Method::GET,
            &format!("/search/global?q={}", urlencode(query)),
            None,
        )
        .await
    }

    pub async fn calculate_commission(&self, payload: Value) -> Result<Value, ApiError> {
        self.request(Method::POST, "/calculate-commission", Some(payload))
            .await
    }
}

/// Minimal query-string escaping for search terms (space, &, =, %, +, #).
pub(crate) fn urlencode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            '%' => out.push_str("%25"),
            '+' => out.push_str("%2B"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}
