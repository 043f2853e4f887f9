use crate::model::{Country, Employee, EmployeeId};
use anyhow::{bail, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cómo se identifica al empleado de un caso especial.
/// Se prefiere el id; el nombre queda para datos legados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeMatch {
    Id(EmployeeId),
    Name(String),
}

/// Regla de override. `days` usa numeración ISO 1=lunes..7=domingo;
/// vacío aplica todos los días.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SpecialRule {
    FixedShift {
        entry: NaiveTime,
        exit: NaiveTime,
        #[serde(default)]
        days: Vec<u8>,
    },
    ClampEntry {
        min: NaiveTime,
        max: NaiveTime,
        #[serde(default)]
        days: Vec<u8>,
    },
    ExcludeWeekends,
    ExcludeHolidays,
}

impl SpecialRule {
    /// ¿La regla aplica a este día de la semana (1..=7)?
    pub fn applies_on(&self, iso_weekday: u8) -> bool {
        match self {
            SpecialRule::FixedShift { days, .. } | SpecialRule::ClampEntry { days, .. } => {
                days.is_empty() || days.contains(&iso_weekday)
            }
            SpecialRule::ExcludeWeekends | SpecialRule::ExcludeHolidays => true,
        }
    }
}

/// Caso especial de un empleado: lista ordenada de reglas;
/// la primera regla aplicable de cada tipo gana.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialCase {
    pub employee: EmployeeMatch,
    pub country: Country,
    pub rules: Vec<SpecialRule>,
}

impl SpecialCase {
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            bail!("special case must contain at least one rule");
        }
        for rule in &self.rules {
            if let SpecialRule::FixedShift { days, .. } | SpecialRule::ClampEntry { days, .. } =
                rule
            {
                if days.iter().any(|d| *d == 0 || *d > 7) {
                    bail!("rule days must use ISO weekday numbers 1..=7");
                }
            }
        }
        Ok(())
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        if self.country != employee.country {
            return false;
        }
        match &self.employee {
            EmployeeMatch::Id(id) => id == &employee.id,
            EmployeeMatch::Name(name) => name == &employee.name,
        }
    }

    pub fn excludes_weekends(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, SpecialRule::ExcludeWeekends))
    }

    pub fn excludes_holidays(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, SpecialRule::ExcludeHolidays))
    }
}

/// Registro de casos especiales, consultado por identidad de empleado.
#[derive(Debug, Clone, Default)]
pub struct SpecialCaseRegistry {
    cases: Vec<SpecialCase>,
}

impl SpecialCaseRegistry {
    pub fn new(cases: Vec<SpecialCase>) -> Result<Self> {
        for case in &cases {
            case.validate()?;
        }
        Ok(Self { cases })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Primer caso que coincide; los match por id tienen prioridad
    /// sobre los match por nombre.
    pub fn lookup(&self, employee: &Employee) -> Option<&SpecialCase> {
        self.cases
            .iter()
            .find(|c| matches!(c.employee, EmployeeMatch::Id(_)) && c.matches(employee))
            .or_else(|| self.cases.iter().find(|c| c.matches(employee)))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)?;
        let cases: Vec<SpecialCase> = serde_json::from_slice(&data)?;
        Self::new(cases)
    }
}
