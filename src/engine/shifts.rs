use super::{grid::PlanGrid, util};
use crate::calendar::HolidayCalendar;
use crate::model::{Assignment, DayType, Employee, ShiftCatalog, ShiftKind};
use crate::policy::Policy;
use chrono::{Datelike, Weekday};
use rand::rngs::StdRng;
use rand::Rng;

/// Horas acumuladas de la semana en curso, a efectos del tope semanal.
/// Se cuenta 9h estándar / 8h reducida por día, no la duración de catálogo.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct HoursLedger {
    pub hours: u32,
    pub reduced_used: bool,
}

/// Asigna horario concreto a cada celda de trabajo, empleado por empleado.
pub(super) fn assign(
    grid: &mut PlanGrid,
    policy: &Policy,
    catalog: &ShiftCatalog,
    holidays: &HolidayCalendar,
    rng: &mut StdRng,
) {
    for e in 0..grid.num_employees() {
        let employee = grid.employees[e].clone();
        let mut ledger = HoursLedger::default();
        for d in 0..grid.num_days() {
            let date = grid.date(d);
            if date.weekday() == Weekday::Mon {
                ledger = HoursLedger::default();
            }
            if grid.cell(e, d).rest {
                continue;
            }
            fill_cell(
                grid.cell_mut(e, d),
                &employee,
                date,
                policy,
                catalog,
                holidays,
                rng,
                &mut ledger,
            );
        }
    }
}

/// Resuelve una celda de trabajo: jornada, horario, reducción y pausas.
/// Catálogo vacío nunca falla la corrida: cae al par por defecto de la Policy.
#[allow(clippy::too_many_arguments)]
pub(super) fn fill_cell(
    cell: &mut Assignment,
    employee: &Employee,
    date: chrono::NaiveDate,
    policy: &Policy,
    catalog: &ShiftCatalog,
    holidays: &HolidayCalendar,
    rng: &mut StdRng,
    ledger: &mut HoursLedger,
) {
    let day_type = holidays.day_type(employee.country, date);
    let entries = catalog.entries(employee.country, day_type);

    let (entry, exit, kind) = if entries.is_empty() {
        let entry = policy.fallback_entry;
        let exit = entry + chrono::Duration::hours(i64::from(policy.standard_shift_hours));
        (entry, exit, ShiftKind::Normal)
    } else {
        let wanted = draw_kind(policy, rng);
        let pick = pick_entry(entries, wanted, rng);
        (pick.0, pick.1, pick.2)
    };

    let mut duration = util::shift_duration_minutes(entry, exit);
    let mut reduced = false;

    // Reducción por tope semanal: solo viernes hábil, una vez por semana.
    if date.weekday() == Weekday::Fri
        && day_type == DayType::Weekday
        && !ledger.reduced_used
        && ledger.hours + policy.standard_shift_hours > policy.weekly_hour_cap
    {
        duration = i64::from(policy.reduced_shift_hours) * 60;
        reduced = true;
        ledger.reduced_used = true;
    }

    let (break1, meal, break2, final_exit) = util::derive_breaks(entry, duration);

    cell.rest = false;
    cell.entry = Some(entry);
    cell.exit = Some(final_exit);
    cell.break1 = Some(break1);
    cell.meal = Some(meal);
    cell.break2 = Some(break2);
    cell.kind = Some(kind);
    cell.reduced = reduced;

    ledger.hours += if reduced {
        policy.reduced_shift_hours
    } else {
        policy.standard_shift_hours
    };
}

/// Sorteo apertura/cierre/normal según los porcentajes de la Policy.
/// Los empates resuelven a normal.
fn draw_kind(policy: &Policy, rng: &mut StdRng) -> ShiftKind {
    let r = rng.gen::<f64>();
    if r < policy.opening_pct {
        ShiftKind::Opening
    } else if r < policy.opening_pct + policy.closing_pct {
        ShiftKind::Closing
    } else {
        ShiftKind::Normal
    }
}

/// Franja concreta del catálogo: primero la jornada sorteada, luego normal,
/// luego cualquiera.
fn pick_entry(
    entries: &[crate::model::ShiftCatalogEntry],
    wanted: ShiftKind,
    rng: &mut StdRng,
) -> (chrono::NaiveTime, chrono::NaiveTime, ShiftKind) {
    let of_kind = |kind: ShiftKind| -> Vec<&crate::model::ShiftCatalogEntry> {
        entries.iter().filter(|s| s.kind == kind).collect()
    };

    let pool = {
        let exact = of_kind(wanted);
        if !exact.is_empty() {
            exact
        } else {
            let normal = of_kind(ShiftKind::Normal);
            if !normal.is_empty() {
                normal
            } else {
                entries.iter().collect()
            }
        }
    };
    let pick = pool[rng.gen_range(0..pool.len())];
    (pick.entry, pick.exit, pick.kind)
}
