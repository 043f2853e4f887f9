use super::{grid::PlanGrid, overlay, shifts, shifts::HoursLedger, util};
use crate::calendar::{is_weekend, HolidayCalendar};
use crate::model::Assignment;
use crate::policy::Policy;
use crate::special::SpecialCaseRegistry;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct BalanceReport {
    pub flips: u32,
    /// Flips sin hueco de compensación en la semana: el empleado excede
    /// su cupo semanal antes que dejar el día descubierto.
    pub overruns: u32,
}

/// Pase de reparación local: por fecha, si la dotación queda bajo el umbral,
/// convierte descansos en trabajo y compensa dentro de la misma semana ISO.
/// No re-ejecuta el reparto completo.
pub(super) fn rebalance(
    grid: &mut PlanGrid,
    policy: &Policy,
    catalog: &crate::model::ShiftCatalog,
    holidays: &HolidayCalendar,
    specials: &SpecialCaseRegistry,
    rng: &mut StdRng,
) -> BalanceReport {
    let active = grid.num_employees() as u32;
    let mut report = BalanceReport::default();

    for d in 0..grid.num_days() {
        let date = grid.date(d);
        let threshold = day_threshold(policy, active, band_day(grid, holidays, date));

        while grid.day_work_count(d) < threshold {
            let Some(e) = pick_candidate(grid, policy, holidays, specials, d) else {
                break;
            };
            let employee = grid.employees[e].clone();
            let mut ledger = week_ledger(grid, policy, e, d);
            shifts::fill_cell(
                grid.cell_mut(e, d),
                &employee,
                date,
                policy,
                catalog,
                holidays,
                rng,
                &mut ledger,
            );
            if let Some(case) = specials.lookup(&employee).cloned() {
                // Error de regla ya contabilizado en el pase de overlay.
                let _ = overlay::apply_rules(grid.cell_mut(e, d), &case, date);
            }
            report.flips += 1;

            match find_compensation(grid, policy, holidays, active, e, d) {
                Some(donor) => {
                    let donor_date = grid.date(donor);
                    *grid.cell_mut(e, donor) = Assignment::rest_day(employee.id, donor_date);
                }
                None => report.overruns += 1,
            }
        }
    }
    report
}

pub(super) fn day_threshold(policy: &Policy, active: u32, weekendish: bool) -> u32 {
    if weekendish {
        policy.weekend_staffing_min.min(active)
    } else {
        ((f64::from(active) * policy.min_coverage_ratio).ceil() as u32).min(active)
    }
}

/// Un feriado de cualquier país presente se dota como fin de semana.
fn band_day(grid: &PlanGrid, holidays: &HolidayCalendar, date: NaiveDate) -> bool {
    is_weekend(date)
        || grid
            .employees
            .iter()
            .any(|e| holidays.is_holiday(e.country, date))
}

/// Empleado descansando ese día que puede pasar a trabajar sin romper la
/// exclusión de su caso especial ni el tope de días consecutivos.
fn pick_candidate(
    grid: &PlanGrid,
    policy: &Policy,
    holidays: &HolidayCalendar,
    specials: &SpecialCaseRegistry,
    d: usize,
) -> Option<usize> {
    let date = grid.date(d);
    (0..grid.num_employees()).find(|&e| {
        if grid.cell(e, d).is_working() {
            return false;
        }
        let employee = &grid.employees[e];
        if let Some(case) = specials.lookup(employee) {
            if case.excludes_weekends() && is_weekend(date) {
                return false;
            }
            if case.excludes_holidays() && holidays.is_holiday(employee.country, date) {
                return false;
            }
        }
        run_if_worked(grid, e, d) <= u32::from(policy.max_consecutive_workdays)
    })
}

/// Largo de la racha de trabajo que resultaría si `e` trabajara el día `d`.
fn run_if_worked(grid: &PlanGrid, e: usize, d: usize) -> u32 {
    let mut run = 1u32;
    let mut i = d;
    while i > 0 && grid.cell(e, i - 1).is_working() {
        run += 1;
        i -= 1;
    }
    let mut j = d + 1;
    while j < grid.num_days() && grid.cell(e, j).is_working() {
        run += 1;
        j += 1;
    }
    run
}

/// Día de trabajo del mismo empleado, misma semana ISO, a ±3 días, que puede
/// ceder dotación sin caer bajo su propio umbral. Nunca un lunes.
fn find_compensation(
    grid: &PlanGrid,
    policy: &Policy,
    holidays: &HolidayCalendar,
    active: u32,
    e: usize,
    d: usize,
) -> Option<usize> {
    let date = grid.date(d);
    let week = util::iso_week_key(date);

    for offset in [1i64, -1, 2, -2, 3, -3] {
        let candidate = d as i64 + offset;
        if candidate < 0 || candidate >= grid.num_days() as i64 {
            continue;
        }
        let c = candidate as usize;
        let c_date = grid.date(c);
        if util::iso_week_key(c_date) != week || c_date.weekday() == Weekday::Mon {
            continue;
        }
        if !grid.cell(e, c).is_working() {
            continue;
        }
        let threshold = day_threshold(policy, active, band_day(grid, holidays, c_date));
        if grid.day_work_count(c) > threshold {
            return Some(c);
        }
    }
    None
}

/// Reconstruye las horas ya asignadas en la semana ISO de `d`.
fn week_ledger(grid: &PlanGrid, policy: &Policy, e: usize, d: usize) -> HoursLedger {
    let week = util::iso_week_key(grid.date(d));
    let mut ledger = HoursLedger::default();
    for i in 0..grid.num_days() {
        if i == d || util::iso_week_key(grid.date(i)) != week {
            continue;
        }
        let cell = grid.cell(e, i);
        if cell.is_working() {
            ledger.hours += if cell.reduced {
                policy.reduced_shift_hours
            } else {
                policy.standard_shift_hours
            };
            ledger.reduced_used |= cell.reduced;
        }
    }
    ledger
}
