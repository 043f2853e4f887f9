use super::{grid::PlanGrid, util};
use crate::model::Assignment;
use crate::special::{SpecialCase, SpecialCaseRegistry, SpecialRule};
use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Regla malformada: la celda conserva la asignación genérica y el error
/// se cuenta en las estadísticas, nunca se propaga.
#[derive(Error, Debug)]
pub(super) enum OverlayError {
    #[error("fixed shift entry and exit cannot be equal")]
    EmptyFixedShift,
    #[error("clamp min cannot exceed max")]
    InvalidClamp,
}

/// Ajusta las celdas de trabajo de los empleados con caso especial.
/// Este pase nunca convierte trabajo en descanso ni al revés.
pub(super) fn apply(grid: &mut PlanGrid, specials: &SpecialCaseRegistry) -> u32 {
    let mut errors = 0u32;
    for e in 0..grid.num_employees() {
        let Some(case) = specials.lookup(&grid.employees[e]).cloned() else {
            continue;
        };
        for d in 0..grid.num_days() {
            let date = grid.date(d);
            if grid.cell(e, d).rest {
                continue;
            }
            if apply_rules(grid.cell_mut(e, d), &case, date).is_err() {
                errors += 1;
            }
        }
    }
    errors
}

/// Reglas en orden de lista; la primera aplicable de cada tipo gana.
pub(super) fn apply_rules(
    cell: &mut Assignment,
    case: &SpecialCase,
    date: NaiveDate,
) -> Result<bool, OverlayError> {
    let iso_weekday = date.weekday().number_from_monday() as u8;
    let mut fixed_done = false;
    let mut clamp_done = false;
    let mut changed = false;

    for rule in &case.rules {
        if !rule.applies_on(iso_weekday) {
            continue;
        }
        match rule {
            SpecialRule::FixedShift { entry, exit, .. } if !fixed_done => {
                if entry == exit {
                    return Err(OverlayError::EmptyFixedShift);
                }
                let duration = util::shift_duration_minutes(*entry, *exit);
                set_times(cell, *entry, duration);
                cell.reduced = false;
                fixed_done = true;
                changed = true;
            }
            SpecialRule::ClampEntry { min, max, .. } if !clamp_done => {
                if min > max {
                    return Err(OverlayError::InvalidClamp);
                }
                clamp_done = true;
                let Some(current) = cell.entry else { continue };
                let snapped = if current < *min {
                    *min
                } else if current > *max {
                    *max
                } else {
                    current
                };
                if snapped != current {
                    // Se desplaza la jornada completa, conservando duración.
                    let duration = cell
                        .exit
                        .map(|exit| util::shift_duration_minutes(current, exit))
                        .unwrap_or(0);
                    set_times(cell, snapped, duration);
                    changed = true;
                }
            }
            // Las exclusiones se resuelven en el reparto de descansos.
            _ => {}
        }
    }
    Ok(changed)
}

fn set_times(cell: &mut Assignment, entry: chrono::NaiveTime, duration_minutes: i64) {
    let (break1, meal, break2, exit) = util::derive_breaks(entry, duration_minutes);
    cell.entry = Some(entry);
    cell.break1 = Some(break1);
    cell.meal = Some(meal);
    cell.break2 = Some(break2);
    cell.exit = Some(exit);
}
