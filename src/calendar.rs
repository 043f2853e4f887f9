use crate::model::{Country, DayType};
use anyhow::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Feriado puntual de un país.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    pub country: Country,
    pub date: NaiveDate,
}

/// Calendario de feriados consultado en modo lectura por el motor.
/// Los feriados se tratan como fin de semana.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    days: HashSet<(Country, NaiveDate)>,
}

impl HolidayCalendar {
    pub fn from_entries(entries: Vec<Holiday>) -> Self {
        Self {
            days: entries.into_iter().map(|h| (h.country, h.date)).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_holiday(&self, country: Country, date: NaiveDate) -> bool {
        self.days.contains(&(country, date))
    }

    /// Tipo de día efectivo: sábado, domingo o feriado cuentan igual.
    pub fn day_type(&self, country: Country, date: NaiveDate) -> DayType {
        if is_weekend(date) || self.is_holiday(country, date) {
            DayType::WeekendOrHoliday
        } else {
            DayType::Weekday
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)?;
        let entries: Vec<Holiday> = serde_json::from_slice(&data)?;
        Ok(Self::from_entries(entries))
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}
