mod balance;
mod grid;
mod overlay;
mod restdays;
mod shifts;
mod state;
mod util;

use crate::calendar::{is_weekend, HolidayCalendar};
use crate::model::{Assignment, Employee, EmployeeId, ShiftCatalog};
use crate::policy::Policy;
use crate::special::SpecialCaseRegistry;
use chrono::NaiveDate;
use grid::PlanGrid;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid date range: end must be on or after start")]
    InvalidDateRange,
    #[error("no active employees to schedule")]
    NoEmployees,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Parámetros de una corrida: rango de fechas inclusivo.
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl RunParams {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.end < self.start {
            return Err(EngineError::InvalidDateRange);
        }
        Ok(())
    }
}

/// Conteo semanal por empleado, para auditar el cumplimiento 5x2.
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyCompliance {
    pub employee_id: EmployeeId,
    pub iso_year: i32,
    pub iso_week: u32,
    pub workdays: u32,
    pub restdays: u32,
}

/// Estadísticas de la corrida.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RunStats {
    pub days: u32,
    pub employees: u32,
    pub assignments: u32,
    pub workdays: u32,
    pub restdays: u32,
    pub weekend_workdays: u32,
    pub reduced_days: u32,
    /// Celdas cuya regla especial resultó malformada y quedaron con la
    /// asignación genérica.
    pub cell_errors: u32,
    pub coverage_flips: u32,
    pub quota_overruns: u32,
    pub weekly: Vec<WeeklyCompliance>,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub assignments: Vec<Assignment>,
    pub stats: RunStats,
}

/// Motor de generación de mallas. Recibe todas sus dependencias por
/// referencia (nada de singletons de proceso) y una fuente aleatoria
/// inyectable para corridas reproducibles.
pub struct RosterEngine<'a> {
    policy: &'a Policy,
    catalog: &'a ShiftCatalog,
    holidays: &'a HolidayCalendar,
    specials: &'a SpecialCaseRegistry,
    rng: StdRng,
}

impl<'a> RosterEngine<'a> {
    pub fn new(
        policy: &'a Policy,
        catalog: &'a ShiftCatalog,
        holidays: &'a HolidayCalendar,
        specials: &'a SpecialCaseRegistry,
    ) -> Self {
        Self {
            policy,
            catalog,
            holidays,
            specials,
            rng: StdRng::from_entropy(),
        }
    }

    /// Variante con semilla fija, para tests y corridas reproducibles.
    pub fn with_seed(
        policy: &'a Policy,
        catalog: &'a ShiftCatalog,
        holidays: &'a HolidayCalendar,
        specials: &'a SpecialCaseRegistry,
        seed: u64,
    ) -> Self {
        Self {
            policy,
            catalog,
            holidays,
            specials,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Pipeline completo: descansos → horarios → casos especiales →
    /// balance de cobertura → salida. Cada pase consume la malla entera
    /// antes del siguiente.
    pub fn generate(
        &mut self,
        employees: &[Employee],
        params: RunParams,
    ) -> Result<RunOutput, EngineError> {
        params.validate()?;
        let active: Vec<Employee> = employees
            .iter()
            .filter(|e| e.is_active())
            .cloned()
            .collect();
        if active.is_empty() {
            return Err(EngineError::NoEmployees);
        }

        tracing::info!(
            employees = active.len(),
            start = %params.start,
            end = %params.end,
            "generating roster"
        );

        let mut grid = PlanGrid::new(active, params.start, params.end);
        restdays::allocate(&mut grid, self.policy, self.holidays, self.specials, &mut self.rng);
        shifts::assign(&mut grid, self.policy, self.catalog, self.holidays, &mut self.rng);
        let cell_errors = overlay::apply(&mut grid, self.specials);
        let report = balance::rebalance(
            &mut grid,
            self.policy,
            self.catalog,
            self.holidays,
            self.specials,
            &mut self.rng,
        );

        let stats = collect_stats(&grid, cell_errors, report.flips, report.overruns);
        tracing::debug!(
            workdays = stats.workdays,
            restdays = stats.restdays,
            flips = stats.coverage_flips,
            "roster generated"
        );

        Ok(RunOutput {
            assignments: grid.into_assignments(),
            stats,
        })
    }
}

fn collect_stats(grid: &PlanGrid, cell_errors: u32, flips: u32, overruns: u32) -> RunStats {
    let mut stats = RunStats {
        days: grid.num_days() as u32,
        employees: grid.num_employees() as u32,
        assignments: (grid.num_days() * grid.num_employees()) as u32,
        cell_errors,
        coverage_flips: flips,
        quota_overruns: overruns,
        ..RunStats::default()
    };

    let mut weekly: BTreeMap<(String, i32, u32), (u32, u32)> = BTreeMap::new();
    for e in 0..grid.num_employees() {
        for d in 0..grid.num_days() {
            let cell = grid.cell(e, d);
            let date = grid.date(d);
            let (iso_year, iso_week) = util::iso_week_key(date);
            let entry = weekly
                .entry((cell.employee_id.as_str().to_owned(), iso_year, iso_week))
                .or_insert((0, 0));
            if cell.is_working() {
                stats.workdays += 1;
                entry.0 += 1;
                if is_weekend(date) {
                    stats.weekend_workdays += 1;
                }
                if cell.reduced {
                    stats.reduced_days += 1;
                }
            } else {
                stats.restdays += 1;
                entry.1 += 1;
            }
        }
    }

    stats.weekly = weekly
        .into_iter()
        .map(|((id, iso_year, iso_week), (workdays, restdays))| WeeklyCompliance {
            employee_id: EmployeeId::new(id),
            iso_year,
            iso_week,
            workdays,
            restdays,
        })
        .collect();
    stats
}
