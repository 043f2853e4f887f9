use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use uuid::Uuid;

/// Identificador fuerte para Employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(String);

impl EmployeeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// País de operación (cada uno con su propia tabla horaria).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    CountryA,
    CountryB,
}

impl Country {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "countrya" | "country_a" => Ok(Country::CountryA),
            "b" | "countryb" | "country_b" => Ok(Country::CountryB),
            other => bail!("unknown country: {other}"),
        }
    }
}

/// Estado contractual; solo `Active` entra a la malla.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Active,
    OnLeave,
    Inactive,
}

impl EmploymentStatus {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" | "activo" => Ok(EmploymentStatus::Active),
            "onleave" | "on_leave" | "licencia" => Ok(EmploymentStatus::OnLeave),
            "inactive" | "inactivo" => Ok(EmploymentStatus::Inactive),
            other => bail!("unknown employment status: {other}"),
        }
    }
}

/// Agente del call center. Inmutable durante una corrida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub country: Country,
    pub status: EmploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
}

impl Employee {
    pub fn new<N: Into<String>>(name: N, country: Country) -> Self {
        Self {
            id: EmployeeId::random(),
            name: name.into(),
            country,
            status: EmploymentStatus::Active,
            campaign: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EmploymentStatus::Active
    }
}

/// Tipo de día a efectos de tabla horaria y dotación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayType {
    Weekday,
    WeekendOrHoliday,
}

/// Jornada: apertura, cierre o franja normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftKind {
    Opening,
    Closing,
    Normal,
}

impl ShiftKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftKind::Opening => "opening",
            ShiftKind::Closing => "closing",
            ShiftKind::Normal => "normal",
        }
    }
}

/// Franja de la tabla horaria. `exit <= entry` cruza medianoche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCatalogEntry {
    pub entry: NaiveTime,
    pub exit: NaiveTime,
    pub kind: ShiftKind,
}

/// Fila plana del archivo de catálogo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSlot {
    pub country: Country,
    pub day_type: DayType,
    pub entry: NaiveTime,
    pub exit: NaiveTime,
    pub kind: ShiftKind,
}

/// Tabla horaria indexada por (país, tipo de día).
#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    buckets: HashMap<(Country, DayType), Vec<ShiftCatalogEntry>>,
}

impl ShiftCatalog {
    pub fn from_slots(slots: Vec<CatalogSlot>) -> Result<Self> {
        let mut buckets: HashMap<(Country, DayType), Vec<ShiftCatalogEntry>> = HashMap::new();
        for slot in slots {
            if slot.entry == slot.exit {
                bail!("catalog slot entry and exit cannot be equal");
            }
            buckets
                .entry((slot.country, slot.day_type))
                .or_default()
                .push(ShiftCatalogEntry {
                    entry: slot.entry,
                    exit: slot.exit,
                    kind: slot.kind,
                });
        }
        Ok(Self { buckets })
    }

    /// Catálogo vacío: el motor cae al par de horas por defecto de la Policy.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self, country: Country, day_type: DayType) -> &[ShiftCatalogEntry] {
        self.buckets
            .get(&(country, day_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)?;
        let slots: Vec<CatalogSlot> = serde_json::from_slice(&data)?;
        Self::from_slots(slots)
    }
}

/// Celda de salida: un empleado, un día.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub rest: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break1: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub break2: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ShiftKind>,
    #[serde(default)]
    pub reduced: bool,
}

impl Assignment {
    /// Celda de descanso (sin horario).
    pub fn rest_day(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self {
            employee_id,
            date,
            rest: true,
            entry: None,
            exit: None,
            break1: None,
            meal: None,
            break2: None,
            kind: None,
            reduced: false,
        }
    }

    pub fn is_working(&self) -> bool {
        !self.rest
    }
}

/// Malla persistida. El reemplazo por rango imita la semántica
/// delete-overlapping + insert del almacenamiento externo.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Plan {
    pub assignments: Vec<Assignment>,
}

impl Plan {
    pub fn replace_range(&mut self, new: Vec<Assignment>, start: NaiveDate, end: NaiveDate) {
        self.assignments.retain(|a| a.date < start || a.date > end);
        self.assignments.extend(new);
        self.assignments.sort_by(|a, b| {
            (a.date, a.employee_id.as_str()).cmp(&(b.date, b.employee_id.as_str()))
        });
    }

    pub fn find_cell(&self, id: &EmployeeId, date: NaiveDate) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| &a.employee_id == id && a.date == date)
    }
}
