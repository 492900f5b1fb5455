//! HTTP API module for the HR workflow engine.
//!
//! This module exposes every engine operation as a JSON endpoint.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{USER_HEADER, create_router};
pub use request::{
    CreateDepartmentRequest, CreateEmployeeRequest, CreateHolidayRequest, GrievanceResponseRequest,
    HolidayQuery, LoginRequest, PayslipRequest, RoleRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
