use super::{grid::PlanGrid, state::WeekState, util};
use crate::calendar::{is_weekend, HolidayCalendar};
use crate::model::DayType;
use crate::policy::Policy;
use crate::special::SpecialCaseRegistry;
use chrono::{Datelike, Weekday};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Decisión del día para un empleado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Work,
    Rest,
    /// Descanso que no puede revertirse (exclusión, racha al tope,
    /// cupo mensual duro o presión de cupo semanal).
    ForcedRest,
}

/// Reparte los descansos recorriendo las fechas en orden. Lunes siempre se
/// trabaja; el resto del reparto deriva de la presión de cupo
/// `descansos_pendientes / días_restantes_de_la_semana`, amortiguada los
/// fines de semana, y acotada por la banda de dotación de fin de semana.
pub(super) fn allocate(
    grid: &mut PlanGrid,
    policy: &Policy,
    holidays: &HolidayCalendar,
    specials: &SpecialCaseRegistry,
    rng: &mut StdRng,
) {
    let n = grid.num_employees();
    let dates = grid.dates.clone();
    let range_end = dates[dates.len() - 1];
    let mut states: Vec<WeekState> = vec![WeekState::new(); n];

    // Exclusiones fijas por caso especial (fin de semana, feriado).
    let exclusions: Vec<(bool, bool)> = grid
        .employees
        .iter()
        .map(|e| {
            specials
                .lookup(e)
                .map(|c| (c.excludes_weekends(), c.excludes_holidays()))
                .unwrap_or((false, false))
        })
        .collect();

    // Largo de cada semana ISO dentro del rango, para prorratear cupos.
    let mut week_len: HashMap<(i32, u32), u32> = HashMap::new();
    for &date in &dates {
        *week_len.entry(util::iso_week_key(date)).or_insert(0) += 1;
    }

    for d in 0..dates.len() {
        let date = dates[d];
        let weekday = date.weekday();
        if weekday == Weekday::Mon {
            for st in &mut states {
                st.roll_week();
            }
        }
        if date.day() == 1 {
            for st in &mut states {
                st.roll_month();
            }
        }

        let week_days = week_len[&util::iso_week_key(date)];
        let quota = prorated_quota(policy.restdays_per_week, week_days);
        let remaining_days = util::days_left_in_week(date, range_end);

        // Orden barajado para que los descansos del día no caigan siempre
        // en los mismos empleados.
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(rng);

        let mut decisions: Vec<Decision> = vec![Decision::Work; n];
        let mut workers_today: u32 = 0;

        for &e in &order {
            let employee = &grid.employees[e];
            let weekendish =
                holidays.day_type(employee.country, date) == DayType::WeekendOrHoliday;
            let decision = decide(
                &states[e],
                policy,
                exclusions[e],
                date,
                weekday,
                weekendish,
                holidays.is_holiday(employee.country, date),
                quota,
                remaining_days,
                workers_today,
                rng,
            );
            if decision == Decision::Work {
                workers_today += 1;
            }
            decisions[e] = decision;
        }

        // Piso de la banda de fin de semana (o feriado de cualquier país
        // presente): promueve descansos revertibles hasta alcanzar el
        // mínimo, o agotar candidatos.
        let band_day = is_weekend(date)
            || grid
                .employees
                .iter()
                .any(|e| holidays.is_holiday(e.country, date));
        if band_day {
            let floor = policy.weekend_staffing_min.min(n as u32);
            for &e in &order {
                if workers_today >= floor {
                    break;
                }
                if decisions[e] == Decision::Rest {
                    decisions[e] = Decision::Work;
                    workers_today += 1;
                }
            }
        }

        // Confirmar decisiones y avanzar contadores.
        for e in 0..n {
            let rest = decisions[e] != Decision::Work;
            grid.cell_mut(e, d).rest = rest;
            if rest {
                states[e].record_rest(date, is_weekend(date), weekday == Weekday::Sun);
            } else {
                states[e].record_work();
            }
        }
    }
}

/// Cupo de descansos de una semana parcialmente contenida en el rango.
fn prorated_quota(restdays_per_week: u8, week_days_in_range: u32) -> u8 {
    if week_days_in_range >= 7 {
        return restdays_per_week;
    }
    let scaled = f64::from(restdays_per_week) * f64::from(week_days_in_range) / 7.0;
    (scaled.round() as u8).min(restdays_per_week)
}

#[allow(clippy::too_many_arguments)]
fn decide(
    st: &WeekState,
    policy: &Policy,
    (excl_weekends, excl_holidays): (bool, bool),
    date: chrono::NaiveDate,
    weekday: Weekday,
    weekendish: bool,
    holiday: bool,
    quota: u8,
    remaining_days: u32,
    workers_today: u32,
    rng: &mut StdRng,
) -> Decision {
    if excl_weekends && is_weekend(date) {
        return Decision::ForcedRest;
    }
    if excl_holidays && holiday {
        return Decision::ForcedRest;
    }

    // Lunes con dotación completa.
    if weekday == Weekday::Mon {
        return Decision::Work;
    }

    // Racha al tope: el domingo se corta un día antes porque el lunes
    // siguiente es trabajo obligatorio.
    let cap = u32::from(policy.max_consecutive_workdays);
    let effective_cap = if weekday == Weekday::Sun { cap.saturating_sub(1) } else { cap };
    if st.consecutive_workdays >= effective_cap {
        return Decision::ForcedRest;
    }

    // Cupo mensual duro de domingos libres: si quedan justo los domingos
    // necesarios, hay que descansar hoy.
    if policy.monthly_quotas_hard && weekday == Weekday::Sun {
        let shortfall = policy
            .free_sundays_per_month
            .saturating_sub(st.rest_sundays_month);
        if shortfall > 0 && util::sundays_left_in_month(date) <= u32::from(shortfall) {
            return Decision::ForcedRest;
        }
    }

    // Cupo mensual duro de fines de semana libres: el sábado se fuerza
    // cuando quedan justo los pares necesarios, y el domingo completa el
    // par abierto por el sábado descansado.
    if policy.monthly_quotas_hard {
        let shortfall = policy
            .free_weekends_per_month
            .saturating_sub(st.free_weekends_month);
        if shortfall > 0 {
            if weekday == Weekday::Sat {
                let left = util::weekends_left_in_month(date);
                if left > 0 && left <= u32::from(shortfall) {
                    return Decision::ForcedRest;
                }
            }
            if weekday == Weekday::Sun && st.last_restday == date.pred_opt() {
                return Decision::ForcedRest;
            }
        }
    }

    let remaining_rest = quota.saturating_sub(st.restdays);
    if remaining_rest == 0 {
        return Decision::Work;
    }
    // Quedan tantos días como descansos pendientes: descanso obligado.
    if u32::from(remaining_rest) >= remaining_days {
        return Decision::ForcedRest;
    }

    if weekendish {
        // Techo de la banda: pasado el máximo, el resto descansa.
        if workers_today >= policy.weekend_staffing_max {
            return Decision::Rest;
        }
        // A lo sumo un descanso de fin de semana por empleado, salvo que
        // el cupo apriete (caso cubierto arriba).
        if st.weekend_rests >= 1 {
            return Decision::Work;
        }
    }

    // Sorteo por presión de cupo, amortiguado en fin de semana/feriado.
    let mut p = f64::from(remaining_rest) / remaining_days as f64;
    if weekendish {
        p *= policy.weekend_rest_bias;
    }
    // Semana laboral ya completa: el descanso pendiente cae cuanto antes.
    if st.workdays >= policy.workdays_per_week {
        p = p.max(0.9);
    }
    // Cupos mensuales blandos: retener descansos entre semana hace que la
    // presión de cupo termine forzándolos en sábado y domingo.
    if !policy.monthly_quotas_hard
        && !weekendish
        && (st.rest_sundays_month < policy.free_sundays_per_month
            || st.free_weekends_month < policy.free_weekends_per_month)
    {
        p *= 0.9;
    }

    if rng.gen::<f64>() < p {
        Decision::Rest
    } else {
        Decision::Work
    }
}
