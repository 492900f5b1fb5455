//! Shared fixtures for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::clock::{Clock, FixedClock};
use crate::config::ConfigLoader;
use crate::credentials::{Argon2Hasher, CredentialHasher};
use crate::engine::Engine;
use crate::error::WorkflowResult;
use crate::management::AccountRequest;
use crate::models::{
    ContactInfo, CurrentUser, DepartmentId, Employee, EmployeeId, Grievance, GrievanceId,
    LeaveRequest, LeaveRequestId, NewEmployee, Role,
};
use crate::store::{MemoryStore, Store, Tables};

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub(crate) fn new_employee(first: &str, last: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.to_string(),
        last_name: last.to_string(),
        contact: ContactInfo {
            email: format!("{}.{}@example.com", first, last).to_lowercase(),
            ..ContactInfo::default()
        },
        job_title: "Clerk".to_string(),
        hire_date: date(2020, 3, 2),
        salary: Decimal::new(80000, 0),
        tax_rate: None,
        annual_leave_balance: None,
        sick_leave_balance: None,
    }
}

/// Argon2 hashing that records how often it was asked to work.
#[derive(Debug, Default)]
pub(crate) struct CountingHasher {
    hashes: AtomicUsize,
    verifies: AtomicUsize,
}

impl CountingHasher {
    pub fn hashes(&self) -> usize {
        self.hashes.load(Ordering::SeqCst)
    }

    pub fn verifies(&self) -> usize {
        self.verifies.load(Ordering::SeqCst)
    }
}

impl CredentialHasher for CountingHasher {
    fn hash(&self, password: &str) -> WorkflowResult<String> {
        self.hashes.fetch_add(1, Ordering::SeqCst);
        Argon2Hasher.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> WorkflowResult<bool> {
        self.verifies.fetch_add(1, Ordering::SeqCst);
        Argon2Hasher.verify(password, hash)
    }
}

/// An engine frozen on Monday 2024-01-08 with one administrator and one
/// member of staff in the "Head Office" department.
pub(crate) struct Fixture {
    pub engine: Engine<MemoryStore>,
    pub admin: CurrentUser,
    pub staff: CurrentUser,
    pub department_id: DepartmentId,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_balances(20, 10)
    }

    /// Like [`Fixture::new`], with the staff member's starting balances set.
    pub fn with_balances(annual: u32, sick: u32) -> Self {
        Self::build(Arc::new(Argon2Hasher), annual, sick)
    }

    /// Like [`Fixture::new`], with every hash and verify counted.
    pub fn counting_hasher() -> (Self, Arc<CountingHasher>) {
        let hasher = Arc::new(CountingHasher::default());
        let fixture = Self::build(hasher.clone(), 20, 10);
        (fixture, hasher)
    }

    fn build(hasher: Arc<dyn CredentialHasher>, annual: u32, sick: u32) -> Self {
        let engine = Engine::new(
            MemoryStore::new(),
            hasher,
            Arc::new(FixedClock::on(date(2024, 1, 8))),
            &ConfigLoader::default(),
        );

        let bootstrapped = engine
            .bootstrap_admin("Head Office", new_employee("Alex", "Admin"), "admin", "admin-pass")
            .unwrap();
        let admin = CurrentUser::from(&bootstrapped.account);
        let department_id = bootstrapped.employee.department_id;

        let staff_fields = NewEmployee {
            annual_leave_balance: Some(annual),
            sick_leave_balance: Some(sick),
            ..new_employee("Sam", "Staff")
        };
        let created = engine
            .create_employee_with_account(
                &admin,
                staff_fields,
                AccountRequest {
                    username: "sstaff".to_string(),
                    password: "staff-pass".to_string(),
                    role: Role::Employee,
                },
                department_id,
            )
            .unwrap();
        let staff = CurrentUser::from(&created.account);

        Self {
            engine,
            admin,
            staff,
            department_id,
        }
    }

    /// The same data seen from a clock `minutes` later.
    pub fn advance_minutes(&self, minutes: i64) -> Self {
        let later = self.engine.clock.now() + Duration::minutes(minutes);
        Self {
            engine: self.engine.with_clock(Arc::new(FixedClock(later))),
            admin: self.admin,
            staff: self.staff,
            department_id: self.department_id,
        }
    }

    /// Reads straight from the store, bypassing access checks.
    pub fn count<T>(&self, query: impl FnOnce(&Tables) -> T) -> T {
        self.engine.store.read(|tables| Ok(query(tables))).unwrap()
    }

    pub fn employee(&self, id: EmployeeId) -> Employee {
        self.count(|t| t.employees.get(id).cloned()).unwrap()
    }

    pub fn leave_request(&self, id: LeaveRequestId) -> LeaveRequest {
        self.count(|t| t.leave_requests.get(id).cloned()).unwrap()
    }

    pub fn grievance(&self, id: GrievanceId) -> Grievance {
        self.count(|t| t.grievances.get(id).cloned()).unwrap()
    }
}
