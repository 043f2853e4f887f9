use anyhow::{bail, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reglas de negocio resueltas para una corrida. Se carga una vez y no muta.
///
/// Todos los campos tienen default serde, de modo que un archivo parcial
/// (o ausente) nunca es fatal: configuración faltante se recupera con los
/// valores documentados.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default = "default_workdays")]
    pub workdays_per_week: u8,
    #[serde(default = "default_restdays")]
    pub restdays_per_week: u8,
    #[serde(default = "default_max_consecutive")]
    pub max_consecutive_workdays: u8,
    #[serde(default = "default_weekend_min")]
    pub weekend_staffing_min: u32,
    #[serde(default = "default_weekend_max")]
    pub weekend_staffing_max: u32,
    #[serde(default = "default_opening_pct")]
    pub opening_pct: f64,
    #[serde(default = "default_closing_pct")]
    pub closing_pct: f64,
    #[serde(default = "default_weekly_hour_cap")]
    pub weekly_hour_cap: u32,
    #[serde(default = "default_standard_hours")]
    pub standard_shift_hours: u32,
    #[serde(default = "default_reduced_hours")]
    pub reduced_shift_hours: u32,
    /// Piso de cobertura entre semana, como fracción de la dotación activa.
    #[serde(default = "default_min_coverage")]
    pub min_coverage_ratio: f64,
    /// Amortiguador de la probabilidad de descanso en fin de semana/feriado.
    /// Parámetro de ajuste, no un contrato.
    #[serde(default = "default_weekend_bias")]
    pub weekend_rest_bias: f64,
    /// Si true, los cupos mensuales son restricción dura; si false, solo
    /// sesgan el sorteo.
    #[serde(default)]
    pub monthly_quotas_hard: bool,
    #[serde(default = "default_free_sundays")]
    pub free_sundays_per_month: u8,
    #[serde(default = "default_free_weekends")]
    pub free_weekends_per_month: u8,
    /// Hora de entrada usada cuando el catálogo no tiene franjas.
    #[serde(default = "default_fallback_entry")]
    pub fallback_entry: NaiveTime,
}

fn default_workdays() -> u8 {
    5
}
fn default_restdays() -> u8 {
    2
}
fn default_max_consecutive() -> u8 {
    6
}
fn default_weekend_min() -> u32 {
    16
}
fn default_weekend_max() -> u32 {
    20
}
fn default_opening_pct() -> f64 {
    0.20
}
fn default_closing_pct() -> f64 {
    0.20
}
fn default_weekly_hour_cap() -> u32 {
    44
}
fn default_standard_hours() -> u32 {
    9
}
fn default_reduced_hours() -> u32 {
    8
}
fn default_min_coverage() -> f64 {
    0.60
}
fn default_weekend_bias() -> f64 {
    0.60
}
fn default_free_sundays() -> u8 {
    2
}
fn default_free_weekends() -> u8 {
    1
}
fn default_fallback_entry() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid time")
}

impl Default for Policy {
    fn default() -> Self {
        // Equivalente a deserializar `{}`.
        serde_json::from_str("{}").expect("empty policy object deserializes")
    }
}

impl Policy {
    pub fn validate(&self) -> Result<()> {
        if self.restdays_per_week == 0 || self.restdays_per_week >= 7 {
            bail!("restdays_per_week must be in 1..=6");
        }
        if u32::from(self.workdays_per_week) + u32::from(self.restdays_per_week) > 7 {
            bail!("workdays + restdays cannot exceed 7");
        }
        if self.max_consecutive_workdays == 0 {
            bail!("max_consecutive_workdays must be > 0");
        }
        if !(0.0..=1.0).contains(&self.opening_pct) || !(0.0..=1.0).contains(&self.closing_pct) {
            bail!("shift percentages must be within [0, 1]");
        }
        if self.opening_pct + self.closing_pct > 1.0 {
            bail!("opening_pct + closing_pct cannot exceed 1.0");
        }
        if self.reduced_shift_hours == 0 || self.reduced_shift_hours > self.standard_shift_hours {
            bail!("reduced_shift_hours must be in 1..=standard_shift_hours");
        }
        if self.weekend_staffing_min > self.weekend_staffing_max {
            bail!("weekend_staffing_min cannot exceed weekend_staffing_max");
        }
        if !(0.0..=1.0).contains(&self.min_coverage_ratio) {
            bail!("min_coverage_ratio must be within [0, 1]");
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(&path)?;
        let policy: Policy = serde_json::from_slice(&data)?;
        policy.validate()?;
        Ok(policy)
    }
}
