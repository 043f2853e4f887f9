use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike, Weekday};

/// Clave de semana ISO (año, número).
pub(super) fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Días de la semana ISO que quedan por delante (incluyendo `date`),
/// recortados al final del rango.
pub(super) fn days_left_in_week(date: NaiveDate, range_end: NaiveDate) -> u32 {
    let to_sunday = 8 - date.weekday().number_from_monday();
    let to_range_end = (range_end - date).num_days() + 1;
    to_sunday.min(to_range_end.max(0) as u32)
}

/// Duración en minutos; `exit <= entry` cruza medianoche.
pub(super) fn shift_duration_minutes(entry: NaiveTime, exit: NaiveTime) -> i64 {
    let start = i64::from(entry.num_seconds_from_midnight());
    let mut end = i64::from(exit.num_seconds_from_midnight());
    if end <= start {
        end += 24 * 60 * 60;
    }
    (end - start) / 60
}

/// Pausas proporcionales al 20/50/80% de la jornada, salida al 100%.
/// La proporción se mantiene aunque la jornada esté reducida.
pub(super) fn derive_breaks(
    entry: NaiveTime,
    duration_minutes: i64,
) -> (NaiveTime, NaiveTime, NaiveTime, NaiveTime) {
    let at = |pct: f64| entry + Duration::minutes((duration_minutes as f64 * pct) as i64);
    (at(0.20), at(0.50), at(0.80), at(1.0))
}

/// Pares sábado+domingo completos que quedan en el mes de `date`,
/// contando el par en curso si su sábado no pasó todavía.
pub(super) fn weekends_left_in_month(date: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = date;
    while cursor.month() == date.month() {
        if cursor.weekday() == Weekday::Sat {
            if let Some(sunday) = cursor.succ_opt() {
                if sunday.month() == date.month() {
                    count += 1;
                }
            }
        }
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    count
}

/// Domingos que quedan en el mes de `date`, incluyéndola si aplica.
pub(super) fn sundays_left_in_month(date: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = date;
    while cursor.month() == date.month() {
        if cursor.weekday() == Weekday::Sun {
            count += 1;
        }
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    count
}
