use chrono::NaiveDate;
use serde::Deserialize;

use super::error::DomainError;
use super::status::Status;
use super::user::require_text;

const MAX_AGE: i32 = 150;

/// Death registration as submitted by field staff.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeathRecord {
    pub name: String,
    pub phone_no: String,
    pub age: i32,
    pub gender: String,
    pub aadhar_number: String,
    pub address: String,
    pub date_of_death: NaiveDate,
    #[serde(rename = "gramPanchayatID")]
    pub gram_panchayat_id: i64,
    pub gaon_id: i64,
}

impl NewDeathRecord {
    /// Trims text fields and checks the values a registration must carry.
    pub fn validated(self, today: NaiveDate) -> Result<Self, DomainError> {
        if !(0..=MAX_AGE).contains(&self.age) {
            return Err(DomainError::validation(format!("age must be between 0 and {}", MAX_AGE)));
        }
        if self.date_of_death > today {
            return Err(DomainError::validation("date of death cannot be in the future"));
        }
        Ok(Self {
            name: require_text("name", &self.name)?,
            phone_no: require_text("phone number", &self.phone_no)?,
            gender: require_text("gender", &self.gender)?,
            aadhar_number: require_text("aadhar number", &self.aadhar_number)?,
            address: require_text("address", &self.address)?,
            ..self
        })
    }
}

/// A task row to be created for a freshly registered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTask {
    pub death_id: i64,
    pub task_type_id: i64,
    pub status: Status,
}

/// One `new` task per existing task type.
pub fn fan_out(death_id: i64, task_type_ids: &[i64]) -> Vec<NewTask> {
    task_type_ids
        .iter()
        .map(|&task_type_id| NewTask {
            death_id,
            task_type_id,
            status: Status::New,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn record() -> NewDeathRecord {
        NewDeathRecord {
            name: " Sita Devi ".into(),
            phone_no: "9876543210".into(),
            age: 71,
            gender: "F".into(),
            aadhar_number: "1234 5678 9012".into(),
            address: "Ward 3".into(),
            date_of_death: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            gram_panchayat_id: 1,
            gaon_id: 2,
        }
    }

    #[test]
    fn fan_out_creates_one_new_task_per_type() {
        let tasks = fan_out(9, &[1, 2, 3, 4]);
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(|t| t.status == Status::New && t.death_id == 9));
        assert_eq!(tasks.iter().map(|t| t.task_type_id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn fan_out_without_types_is_empty() {
        assert!(fan_out(9, &[]).is_empty());
    }

    #[test]
    fn validation_trims_text() {
        let r = record().validated(today()).unwrap();
        assert_eq!(r.name, "Sita Devi");
    }

    #[test]
    fn validation_rejects_blank_fields_and_bad_values() {
        let mut r = record();
        r.address = "  ".into();
        assert!(r.validated(today()).is_err());

        let mut r = record();
        r.age = 151;
        assert!(r.validated(today()).is_err());

        let mut r = record();
        r.date_of_death = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        assert!(r.validated(today()).is_err());
    }
}
