//! End-to-end tests for the HR workflow API.
//!
//! Each test drives a fresh in-memory engine through the HTTP router:
//! - Leave approval and the balance ledger
//! - Leave and grievance state machines
//! - Payslip arithmetic
//! - Department deletion guard
//! - Username uniqueness and atomic employee creation
//! - Role enforcement

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use hr_workflow::Engine;
use hr_workflow::api::{AppState, USER_HEADER, create_router};
use hr_workflow::config::ConfigLoader;
use hr_workflow::models::{ContactInfo, NewEmployee};
use hr_workflow::store::Store;

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    engine: Engine,
    router: Router,
    admin: i64,
    department_id: i64,
}

impl TestApp {
    fn new() -> Self {
        let config = ConfigLoader::load("./config").expect("Failed to load config");
        let engine = Engine::in_memory(&config);
        let admin = engine
            .bootstrap_admin("Head Office", new_hire("Alex", "Admin"), "root", "root-pass")
            .expect("Failed to bootstrap admin");
        let router = create_router(AppState::new(engine.clone()));
        TestApp {
            engine,
            router,
            admin: admin.account.id,
            department_id: admin.employee.department_id,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(account_id) = user {
            builder = builder.header(USER_HEADER, account_id.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Creates an Employee-role member of staff and returns
    /// `(account_id, employee_id)`.
    async fn hire(&self, username: &str) -> (i64, i64) {
        let (status, body) = self
            .call(
                "POST",
                "/employees",
                Some(self.admin),
                Some(json!({
                    "employee": {
                        "first_name": "Sam",
                        "last_name": username,
                        "contact": {"email": format!("{}@example.com", username)},
                        "job_title": "Clerk",
                        "hire_date": "2021-04-01",
                        "salary": "52000"
                    },
                    "account": {"username": username, "password": "staff-pass", "role": "Employee"},
                    "department_id": self.department_id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "hire failed: {}", body);
        (
            body["account"]["id"].as_i64().unwrap(),
            body["employee"]["id"].as_i64().unwrap(),
        )
    }

    fn employee_count(&self) -> usize {
        self.engine
            .store()
            .read(|tables| Ok(tables.employees.len()))
            .unwrap()
    }
}

fn new_hire(first: &str, last: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        contact: ContactInfo {
            email: format!("{}@example.com", first.to_lowercase()),
            ..ContactInfo::default()
        },
        job_title: "Administrator".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2019, 1, 7).unwrap(),
        salary: Decimal::new(90000, 0),
        tax_rate: None,
        annual_leave_balance: None,
        sick_leave_balance: None,
    }
}

/// A date `days` from today.
fn days_ahead(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn leave_body(leave_type: &str, start: i64, end: i64) -> Value {
    json!({
        "leave_type": leave_type,
        "start_date": days_ahead(start),
        "end_date": days_ahead(end),
        "reason": "Family visit"
    })
}

// =============================================================================
// Leave workflow
// =============================================================================

#[tokio::test]
async fn test_approval_draws_down_matching_balance() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;

    let (status, request) = app
        .call(
            "POST",
            &format!("/employees/{}/leave-requests", employee),
            Some(staff),
            Some(leave_body("Annual", 10, 12)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["days_requested"], 3);
    assert_eq!(request["status"], "Pending");

    let (status, approved) = app
        .call(
            "POST",
            &format!("/leave-requests/{}/approve", request["id"]),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "Approved");
    assert_eq!(approved["approver_id"], app.admin);

    let (_, balance) = app
        .call(
            "GET",
            &format!("/employees/{}/leave-balance", employee),
            Some(staff),
            None,
        )
        .await;
    assert_eq!(balance["annual"], 17);
    assert_eq!(balance["sick"], 10);
}

#[tokio::test]
async fn test_rejection_leaves_balances_and_blocks_further_decisions() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;

    let (_, request) = app
        .call(
            "POST",
            &format!("/employees/{}/leave-requests", employee),
            Some(staff),
            Some(leave_body("Sick", 1, 2)),
        )
        .await;
    let id = request["id"].as_i64().unwrap();

    let (status, rejected) = app
        .call("POST", &format!("/leave-requests/{}/reject", id), Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "Rejected");

    let (status, error) = app
        .call("POST", &format!("/leave-requests/{}/approve", id), Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INVALID_STATE");

    let (_, balance) = app
        .call(
            "GET",
            &format!("/employees/{}/leave-balance", employee),
            Some(staff),
            None,
        )
        .await;
    assert_eq!(balance["sick"], 10);
    assert_eq!(balance["annual"], 20);
}

#[tokio::test]
async fn test_staff_cannot_decide_leave() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;
    let (_, request) = app
        .call(
            "POST",
            &format!("/employees/{}/leave-requests", employee),
            Some(staff),
            Some(leave_body("Unpaid", 5, 5)),
        )
        .await;

    let (status, error) = app
        .call(
            "POST",
            &format!("/leave-requests/{}/approve", request["id"]),
            Some(staff),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["code"], "PERMISSION_DENIED");

    let (status, _) = app
        .call("GET", "/leave-requests/pending", Some(staff), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, pending) = app
        .call("GET", "/leave-requests/pending", Some(app.admin), None)
        .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_leave_in_the_past_is_rejected() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;
    let (status, error) = app
        .call(
            "POST",
            &format!("/employees/{}/leave-requests", employee),
            Some(staff),
            Some(leave_body("Annual", -3, -1)),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert_eq!(error["details"], "start_date");
}

// =============================================================================
// Grievances
// =============================================================================

#[tokio::test]
async fn test_grievance_title_length_boundary() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;
    let uri = format!("/employees/{}/grievances", employee);
    let body = |title: &str| {
        json!({
            "grievance_type": "WorkingConditions",
            "title": title,
            "description": "The loading dock has had no lighting for a week.",
            "incident_dates": [Utc::now().date_naive().to_string()]
        })
    };

    let (status, error) = app.call("POST", &uri, Some(staff), Some(body("Dock"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"], "title");

    let (status, grievance) = app.call("POST", &uri, Some(staff), Some(body("Docks"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grievance["status"], "Open");
}

#[tokio::test]
async fn test_grievance_respond_then_close() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;
    let (_, grievance) = app
        .call(
            "POST",
            &format!("/employees/{}/grievances", employee),
            Some(staff),
            Some(json!({
                "grievance_type": "Management",
                "title": "Rota changes",
                "description": "Shifts are changed with less than a day of notice.",
                "incident_dates": [Utc::now().date_naive().to_string()]
            })),
        )
        .await;
    let id = grievance["id"].as_i64().unwrap();

    let (status, responded) = app
        .call(
            "POST",
            &format!("/grievances/{}/respond", id),
            Some(app.admin),
            Some(json!({"response": "We will publish rotas two weeks ahead."})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(responded["status"], "InProgress");

    let (_, open) = app.call("GET", "/grievances/open", Some(app.admin), None).await;
    assert_eq!(open.as_array().unwrap().len(), 1);

    let (status, closed) = app
        .call("POST", &format!("/grievances/{}/close", id), Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["status"], "Closed");
    assert!(closed["resolved_at"].is_string());

    let (status, _) = app
        .call("POST", &format!("/grievances/{}/close", id), Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// =============================================================================
// Payroll
// =============================================================================

#[tokio::test]
async fn test_payslip_at_thirty_percent() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/employees/{}", employee),
            Some(app.admin),
            Some(json!({"tax_rate": "30"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, payslip) = app
        .call(
            "POST",
            &format!("/employees/{}/payslips", employee),
            Some(app.admin),
            Some(json!({
                "period_start": "2024-01-01",
                "period_end": "2024-12-31",
                "gross_salary": "80000"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&payslip["tax_deduction"]), Decimal::new(2400000, 2));
    assert_eq!(decimal(&payslip["net_salary"]), Decimal::new(5600000, 2));

    let (_, listed) = app
        .call("GET", &format!("/employees/{}/payslips", employee), Some(staff), None)
        .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

// =============================================================================
// Management
// =============================================================================

#[tokio::test]
async fn test_department_delete_guard() {
    let app = TestApp::new();

    let (status, error) = app
        .call(
            "DELETE",
            &format!("/departments/{}", app.department_id),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "HAS_DEPENDENTS");

    let (status, empty) = app
        .call(
            "POST",
            "/departments",
            Some(app.admin),
            Some(json!({"name": "Research"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/departments/{}", empty["id"]),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, departments) = app.call("GET", "/departments", None, None).await;
    assert_eq!(departments.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_usernames_are_unique_ignoring_case() {
    let app = TestApp::new();
    app.hire("Admin").await;
    let before = app.employee_count();

    let (status, error) = app
        .call(
            "POST",
            "/employees",
            Some(app.admin),
            Some(json!({
                "employee": {
                    "first_name": "Second",
                    "last_name": "Admin",
                    "contact": {"email": "second@example.com"},
                    "job_title": "Clerk",
                    "hire_date": "2022-02-01",
                    "salary": "40000"
                },
                "account": {"username": "admin", "password": "other-pass", "role": "Employee"},
                "department_id": app.department_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE");
    assert_eq!(app.employee_count(), before);
}

#[tokio::test]
async fn test_login_and_deactivation() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;

    let (status, user) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({"username": "SSTAFF", "password": "staff-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["account_id"], staff);
    assert_eq!(user["role"], "Employee");

    let (status, _) = app
        .call(
            "POST",
            &format!("/employees/{}/toggle-active", employee),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "POST",
            "/login",
            None,
            Some(json!({"username": "sstaff", "password": "staff-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call("GET", &format!("/employees/{}", employee), Some(staff), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_employee_cascades_requests() {
    let app = TestApp::new();
    let (staff, employee) = app.hire("sstaff").await;
    app.call(
        "POST",
        &format!("/employees/{}/leave-requests", employee),
        Some(staff),
        Some(leave_body("Annual", 3, 4)),
    )
    .await;

    let (status, summary) = app
        .call(
            "DELETE",
            &format!("/employees/{}", employee),
            Some(app.admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["accounts"], 1);
    assert_eq!(summary["leave_requests"], 1);

    let (status, _) = app
        .call("GET", "/leave-requests/pending", Some(app.admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let pending = app
        .engine
        .store()
        .read(|tables| Ok(tables.leave_requests.len()))
        .unwrap();
    assert_eq!(pending, 0);
}

#[tokio::test]
async fn test_holiday_calendar() {
    let app = TestApp::new();
    let (status, _) = app
        .call(
            "POST",
            "/holidays",
            Some(app.admin),
            Some(json!({
                "name": "New Year's Day",
                "date": "2024-01-01",
                "holiday_type": "Public",
                "is_recurring": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, holidays) = app.call("GET", "/holidays?year=2026", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(holidays[0]["date"], "2026-01-01");
}
