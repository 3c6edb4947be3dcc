//! Read-side helpers over a snapshot: lookup, search, sort and grouping

use std::cmp::Ordering;
use std::str::FromStr;

use super::Snapshot;
use crate::errors::MedflowError;
use crate::types::{Bed, Department, Patient, RouteRecommendation};

/// Column to sort the patient list by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientSortField {
    Id,
    Name,
    Age,
    Urgency,
    WaitTime,
    Department,
    Status,
}

impl FromStr for PatientSortField {
    type Err = MedflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "age" => Ok(Self::Age),
            "urgency" => Ok(Self::Urgency),
            "waittime" | "wait" => Ok(Self::WaitTime),
            "department" | "dept" => Ok(Self::Department),
            "status" => Ok(Self::Status),
            other => Err(MedflowError::validation("sort", format!("unknown field '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl Snapshot {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn department(&self, id: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    /// Case-insensitive substring match over id, name, status, department and urgency.
    /// An empty query matches everything.
    pub fn search_patients(&self, query: &str) -> Vec<&Patient> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.patients.iter().collect();
        }

        self.patients
            .iter()
            .filter(|p| {
                p.id.to_lowercase().contains(&query)
                    || p.name.to_lowercase().contains(&query)
                    || p.status.as_str().contains(&query)
                    || p.department.to_lowercase().contains(&query)
                    || p.urgency.as_str().contains(&query)
            })
            .collect()
    }

    /// Stable sort of the patient list. Urgency sorts by triage order, strings case-insensitively.
    pub fn sorted_patients(&self, field: PatientSortField, direction: SortDirection) -> Vec<&Patient> {
        let mut patients: Vec<&Patient> = self.patients.iter().collect();
        patients.sort_by(|a, b| {
            let ord = compare(a, b, field);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        patients
    }

    /// Beds grouped under their department, in department order
    pub fn beds_by_department(&self) -> Vec<(&Department, Vec<&Bed>)> {
        self.departments
            .iter()
            .map(|dept| {
                let beds = self.beds.iter().filter(|b| b.department == dept.id).collect();
                (dept, beds)
            })
            .collect()
    }

    /// Seeded triage sample by 1-based number
    pub fn triage_sample(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.triage_samples.get(i))
            .map(String::as_str)
    }

    pub fn recommendations_for(&self, patient_id: &str) -> Vec<&RouteRecommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .collect()
    }
}

fn compare(a: &Patient, b: &Patient, field: PatientSortField) -> Ordering {
    match field {
        PatientSortField::Id => a.id.to_lowercase().cmp(&b.id.to_lowercase()),
        PatientSortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        PatientSortField::Age => a.age.cmp(&b.age),
        PatientSortField::Urgency => a.urgency.cmp(&b.urgency),
        PatientSortField::WaitTime => a.wait_time.cmp(&b.wait_time),
        PatientSortField::Department => a.department.to_lowercase().cmp(&b.department.to_lowercase()),
        PatientSortField::Status => a.status.as_str().cmp(b.status.as_str()),
    }
}
