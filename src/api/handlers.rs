//! HTTP request handlers for the HR workflow API.
//!
//! The acting user is named by the `X-User-Id` header (an account id, as
//! returned by `POST /login`). The engine re-reads that account on every
//! call, so the header only says who is asking, never what they may do.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::WorkflowResult;
use crate::management::EmployeeWithAccount;
use crate::models::{
    AccountId, CurrentUser, Department, DepartmentId, Employee, EmployeeId, EmployeeUpdate,
    Grievance, GrievanceId, Holiday, HolidayId, LeaveRequest, LeaveRequestId, Payslip, Request,
    Role, RoleAssignment,
};
use crate::store::CascadeSummary;
use crate::workflow::{
    GrievanceRecord, GrievanceSubmission, LeaveBalance, LeaveSubmission, PendingLeave,
};

use super::request::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateHolidayRequest, GrievanceResponseRequest,
    HolidayQuery, LoginRequest, PayslipRequest, RoleRequest,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

/// Header carrying the acting account's id.
pub const USER_HEADER: &str = "x-user-id";

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;
type Created<T> = Result<(StatusCode, Json<T>), ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/departments", get(list_departments).post(create_department))
        .route("/departments/:id", delete(delete_department))
        .route("/employees", post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
        .route("/employees/:id/toggle-active", post(toggle_employee))
        .route(
            "/employees/:id/leave-requests",
            get(list_leave_requests).post(submit_leave),
        )
        .route("/employees/:id/leave-balance", get(leave_balance))
        .route(
            "/employees/:id/grievances",
            get(list_grievances).post(submit_grievance),
        )
        .route("/employees/:id/requests", get(list_requests))
        .route(
            "/employees/:id/payslips",
            get(list_payslips).post(generate_payslip),
        )
        .route("/leave-requests/pending", get(pending_leave))
        .route("/leave-requests/:id/approve", post(approve_leave))
        .route("/leave-requests/:id/reject", post(reject_leave))
        .route("/grievances/open", get(open_grievances))
        .route("/grievances/:id/respond", post(respond_to_grievance))
        .route("/grievances/:id/close", post(close_grievance))
        .route("/accounts/:id/roles", get(list_roles).post(assign_role))
        .route("/accounts/:id/roles/:role", delete(revoke_role))
        .route("/holidays", get(list_holidays).post(create_holiday))
        .route("/holidays/:id", delete(delete_holiday))
        .with_state(state)
}

/// Resolves the `X-User-Id` header to the stored identity.
fn acting_user(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiErrorResponse> {
    let raw = headers
        .get(USER_HEADER)
        .ok_or_else(|| ApiErrorResponse::unauthenticated("X-User-Id header is required"))?;
    let account_id: AccountId = raw
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| ApiErrorResponse::unauthenticated("X-User-Id must be an account id"))?;
    state
        .engine()
        .current_user(account_id)
        .map_err(|_| ApiErrorResponse::unauthenticated("Unknown or inactive account"))
}

/// Logs the outcome of an engine call under a fresh correlation id.
fn finish<T>(
    operation: &'static str,
    user: Option<&CurrentUser>,
    result: WorkflowResult<T>,
) -> ApiResult<T> {
    let correlation_id = Uuid::new_v4();
    let account_id = user.map(|u| u.account_id);
    match result {
        Ok(value) => {
            info!(correlation_id = %correlation_id, operation, ?account_id, "request completed");
            Ok(Json(value))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                ?account_id,
                error = %err,
                "request failed"
            );
            Err(err.into())
        }
    }
}

fn created<T>(response: ApiResult<T>) -> Created<T> {
    response.map(|body| (StatusCode::CREATED, body))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health_handler() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<CurrentUser> {
    let Json(body) = payload?;
    let result = state.engine().authenticate(&body.username, &body.password);
    finish("login", None, result)
}

async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    finish("list_departments", None, state.engine().departments())
}

async fn create_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> Created<Department> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state
        .engine()
        .create_department(&user, &body.name, body.description);
    created(finish("create_department", Some(&user), result))
}

async fn delete_department(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<DepartmentId>,
) -> ApiResult<Department> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().delete_department(&user, id);
    finish("delete_department", Some(&user), result)
}

async fn create_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Created<EmployeeWithAccount> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state.engine().create_employee_with_account(
        &user,
        body.employee,
        body.account,
        body.department_id,
    );
    created(finish("create_employee", Some(&user), result))
}

async fn get_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Employee> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().employee(&user, id);
    finish("get_employee", Some(&user), result)
}

async fn update_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult<Employee> {
    let user = acting_user(&state, &headers)?;
    let Json(changes) = payload?;
    let result = state.engine().update_employee(&user, id, changes);
    finish("update_employee", Some(&user), result)
}

async fn delete_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<CascadeSummary> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().delete_employee(&user, id);
    finish("delete_employee", Some(&user), result)
}

async fn toggle_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Employee> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().toggle_employee_active(&user, id);
    finish("toggle_employee_active", Some(&user), result)
}

async fn list_leave_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Vec<LeaveRequest>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().leave_requests_for(&user, id);
    finish("list_leave_requests", Some(&user), result)
}

async fn submit_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<LeaveSubmission>, JsonRejection>,
) -> Created<LeaveRequest> {
    let user = acting_user(&state, &headers)?;
    let Json(submission) = payload?;
    let result = state.engine().submit_leave(&user, id, submission);
    created(finish("submit_leave", Some(&user), result))
}

async fn leave_balance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<LeaveBalance> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().leave_balance(&user, id);
    finish("leave_balance", Some(&user), result)
}

async fn list_grievances(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Vec<GrievanceRecord>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().grievances_for(&user, id);
    finish("list_grievances", Some(&user), result)
}

async fn submit_grievance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<GrievanceSubmission>, JsonRejection>,
) -> Created<Grievance> {
    let user = acting_user(&state, &headers)?;
    let Json(submission) = payload?;
    let result = state.engine().submit_grievance(&user, id, submission);
    created(finish("submit_grievance", Some(&user), result))
}

async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Vec<Request>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().requests_for(&user, id);
    finish("list_requests", Some(&user), result)
}

async fn list_payslips(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Vec<Payslip>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().payslips_for(&user, id);
    finish("list_payslips", Some(&user), result)
}

async fn generate_payslip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    payload: Result<Json<PayslipRequest>, JsonRejection>,
) -> Created<Payslip> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state.engine().generate_payslip(
        &user,
        id,
        body.period_start,
        body.period_end,
        body.gross_salary,
    );
    created(finish("generate_payslip", Some(&user), result))
}

async fn pending_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<PendingLeave>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().pending_leave_requests(&user);
    finish("pending_leave_requests", Some(&user), result)
}

async fn approve_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<LeaveRequestId>,
) -> ApiResult<LeaveRequest> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().approve_leave(&user, id);
    finish("approve_leave", Some(&user), result)
}

async fn reject_leave(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<LeaveRequestId>,
) -> ApiResult<LeaveRequest> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().reject_leave(&user, id);
    finish("reject_leave", Some(&user), result)
}

async fn open_grievances(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<GrievanceRecord>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().open_grievances(&user);
    finish("open_grievances", Some(&user), result)
}

async fn respond_to_grievance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<GrievanceId>,
    payload: Result<Json<GrievanceResponseRequest>, JsonRejection>,
) -> ApiResult<Grievance> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state.engine().respond_to_grievance(&user, id, &body.response);
    finish("respond_to_grievance", Some(&user), result)
}

async fn close_grievance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<GrievanceId>,
) -> ApiResult<Grievance> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().close_grievance(&user, id);
    finish("close_grievance", Some(&user), result)
}

async fn list_roles(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<AccountId>,
) -> ApiResult<Vec<RoleAssignment>> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().account_roles(&user, id);
    finish("account_roles", Some(&user), result)
}

async fn assign_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<AccountId>,
    payload: Result<Json<RoleRequest>, JsonRejection>,
) -> Created<RoleAssignment> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state.engine().assign_role(&user, id, body.role);
    created(finish("assign_role", Some(&user), result))
}

async fn revoke_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((id, role)): Path<(AccountId, Role)>,
) -> Result<StatusCode, ApiErrorResponse> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().revoke_role(&user, id, role);
    finish("revoke_role", Some(&user), result).map(|_| StatusCode::NO_CONTENT)
}

async fn list_holidays(
    State(state): State<AppState>,
    Query(query): Query<HolidayQuery>,
) -> ApiResult<Vec<Holiday>> {
    finish("list_holidays", None, state.engine().holidays_in_year(query.year))
}

async fn create_holiday(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateHolidayRequest>, JsonRejection>,
) -> Created<Holiday> {
    let user = acting_user(&state, &headers)?;
    let Json(body) = payload?;
    let result = state.engine().create_holiday(
        &user,
        &body.name,
        body.date,
        body.holiday_type,
        body.is_recurring,
    );
    created(finish("create_holiday", Some(&user), result))
}

async fn delete_holiday(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<HolidayId>,
) -> Result<StatusCode, ApiErrorResponse> {
    let user = acting_user(&state, &headers)?;
    let result = state.engine().delete_holiday(&user, id);
    finish("delete_holiday", Some(&user), result).map(|_| StatusCode::NO_CONTENT)
}
