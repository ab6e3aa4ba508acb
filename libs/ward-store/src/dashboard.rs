//! Aggregations behind the role dashboards.
//!
//! Pure functions over container snapshots; nothing here talks to the API.

use crate::entity::Record;
use crate::store::Store;
use serde::Serialize;
use serde_json::Value;
use ward_client::{EntityKind, Role};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub admins: usize,
    pub doctors: usize,
    pub patients: usize,
    pub staff: usize,
    pub nurses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseLine {
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VaccinationStatus {
    pub vaccinated: usize,
    pub not_vaccinated: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VaccineMix {
    pub covid: usize,
    pub malaria: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSummary {
    pub roles: RoleCounts,
    pub expense_total: i64,
    pub expenses: Vec<ExpenseLine>,
    pub prescription_collected: i64,
    pub test_collected: i64,
    pub vaccination: VaccinationStatus,
    pub vaccines: VaccineMix,
}

impl AdminSummary {
    pub fn from_store(store: &Store) -> Self {
        let users = store.container(EntityKind::User).records;
        let expenses = store.container(EntityKind::Expense).records;
        let prescriptions = store.container(EntityKind::Prescription).records;
        let tests = store.container(EntityKind::Test).records;
        let appointments = store.container(EntityKind::VaccineAppointment).records;

        Self {
            roles: role_counts(&users),
            expense_total: expense_total(&expenses),
            expenses: expense_breakdown(&expenses),
            prescription_collected: prescription_collected(&prescriptions),
            test_collected: test_collected(&tests),
            vaccination: vaccination_status(&appointments),
            vaccines: vaccine_mix(&appointments),
        }
    }
}

pub fn role_counts(users: &[Record]) -> RoleCounts {
    let mut counts = RoleCounts::default();
    for role in users.iter().filter_map(record_role) {
        match role {
            Role::Admin => counts.admins += 1,
            Role::Doctor => counts.doctors += 1,
            Role::Patient => counts.patients += 1,
            Role::Staff => counts.staff += 1,
            Role::Nurse => counts.nurses += 1,
            Role::Other(_) => {}
        }
    }
    counts
}

pub fn expense_total(expenses: &[Record]) -> i64 {
    saturating_sum(
        expenses
            .iter()
            .map(|e| e.get("amount").map(lenient_int).unwrap_or(0)),
    )
}

pub fn expense_breakdown(expenses: &[Record]) -> Vec<ExpenseLine> {
    expenses
        .iter()
        .map(|e| ExpenseLine {
            name: e.str_field("name").unwrap_or_default().to_string(),
            amount: e.get("amount").map(lenient_int).unwrap_or(0),
        })
        .collect()
}

/// Treatment cost of every paid prescription.
pub fn prescription_collected(prescriptions: &[Record]) -> i64 {
    paid_total(prescriptions, &["treatment", "cost"])
}

/// Test cost of every paid test.
pub fn test_collected(tests: &[Record]) -> i64 {
    paid_total(tests, &["testName", "cost"])
}

pub fn vaccination_status(appointments: &[Record]) -> VaccinationStatus {
    let mut status = VaccinationStatus::default();
    for appointment in appointments
        .iter()
        .filter(|a| vaccine_name(a) == Some("CoronaVirus"))
    {
        if appointment.str_field("taken") == Some("Yes") {
            status.vaccinated += 1;
        } else {
            status.not_vaccinated += 1;
        }
    }
    status
}

pub fn vaccine_mix(appointments: &[Record]) -> VaccineMix {
    let mut mix = VaccineMix::default();
    for name in appointments.iter().filter_map(vaccine_name) {
        match name {
            "CoronaVirus" => mix.covid += 1,
            "Malaria" => mix.malaria += 1,
            _ => {}
        }
    }
    mix
}

/// Integer value of a loosely typed amount.
///
/// Strings contribute their leading integer (`"12.5kg"` is 12); numbers are
/// truncated; anything unparseable counts as zero. Values beyond `i64`
/// saturate at its bounds.
pub fn lenient_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => leading_int(s),
        _ => 0,
    }
}

fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }
    // Sign and digits are parsed together so i64::MIN is representable.
    let signed = &s[..s.len() - digits.len() + end];
    match signed.parse::<i64>() {
        Ok(n) => n,
        Err(_) if negative => i64::MIN,
        Err(_) => i64::MAX,
    }
}

fn paid_total(records: &[Record], cost_path: &[&str]) -> i64 {
    saturating_sum(
        records
            .iter()
            .filter(|r| r.str_field("paid") == Some("Paid"))
            .map(|r| r.pointer(cost_path).map(lenient_int).unwrap_or(0)),
    )
}

/// Totals clamp at the `i64` bounds instead of overflowing.
fn saturating_sum(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0, i64::saturating_add)
}

fn record_role(record: &Record) -> Option<Role> {
    record
        .get("role")
        .and_then(Value::as_i64)
        .map(Role::from)
}

fn vaccine_name(appointment: &Record) -> Option<&str> {
    appointment
        .pointer(&["vaccine", "name"])
        .and_then(Value::as_str)
}
