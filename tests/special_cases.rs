#![forbid(unsafe_code)]
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use turnero::{
    Country, Employee, Holiday, HolidayCalendar, Policy, RosterEngine, RunParams, ShiftCatalog,
    SpecialCase, SpecialCaseRegistry, SpecialRule,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn small_policy() -> Policy {
    Policy {
        weekend_staffing_min: 1,
        weekend_staffing_max: 3,
        min_coverage_ratio: 0.3,
        ..Policy::default()
    }
}

fn team_with_special(rules: Vec<SpecialRule>) -> (Vec<Employee>, SpecialCaseRegistry) {
    let mut employees: Vec<Employee> = (0..5)
        .map(|i| Employee::new(format!("agent-{i}"), Country::CountryA))
        .collect();
    employees.push(Employee::new("Valeria Soto", Country::CountryA));
    let case = SpecialCase {
        employee: turnero::EmployeeMatch::Id(employees[5].id.clone()),
        country: Country::CountryA,
        rules,
    };
    (employees, SpecialCaseRegistry::new(vec![case]).unwrap())
}

#[test]
fn fixed_shift_overrides_every_working_day() {
    let policy = small_policy();
    let catalog = ShiftCatalog::empty();
    let holidays = HolidayCalendar::empty();
    let (employees, specials) = team_with_special(vec![SpecialRule::FixedShift {
        entry: time(7, 0),
        exit: time(17, 0),
        days: vec![],
    }]);

    let mut engine = RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, 13);
    let params = RunParams::new(date(2026, 1, 5), date(2026, 1, 18));
    let output = engine.generate(&employees, params).unwrap();

    let special_id = &employees[5].id;
    for a in output.assignments.iter().filter(|a| &a.employee_id == special_id) {
        if a.is_working() {
            assert_eq!(a.entry, Some(time(7, 0)), "{}", a.date);
            assert_eq!(a.exit, Some(time(17, 0)), "{}", a.date);
        }
    }
    assert_eq!(output.stats.cell_errors, 0);
}

#[test]
fn clamp_snaps_entry_and_preserves_duration() {
    let policy = small_policy();
    // Catálogo vacío: la asignación genérica entra a las 09:00 (9h).
    let catalog = ShiftCatalog::empty();
    let holidays = HolidayCalendar::empty();
    let (employees, specials) = team_with_special(vec![SpecialRule::ClampEntry {
        min: time(10, 0),
        max: time(12, 0),
        days: vec![],
    }]);

    let mut engine = RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, 17);
    let params = RunParams::new(date(2026, 1, 5), date(2026, 1, 11));
    let output = engine.generate(&employees, params).unwrap();

    let special_id = &employees[5].id;
    for a in output.assignments.iter().filter(|a| &a.employee_id == special_id) {
        if a.is_working() {
            assert_eq!(a.entry, Some(time(10, 0)));
            // La jornada completa se corre: 9h desde las 10:00.
            assert_eq!(a.exit, Some(time(19, 0)));
        }
    }
}

#[test]
fn malformed_rule_keeps_generic_assignment_and_counts_error() {
    let policy = small_policy();
    let catalog = ShiftCatalog::empty();
    let holidays = HolidayCalendar::empty();
    let (employees, specials) = team_with_special(vec![SpecialRule::ClampEntry {
        min: time(14, 0),
        max: time(10, 0),
        days: vec![],
    }]);

    let mut engine = RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, 19);
    let params = RunParams::new(date(2026, 1, 5), date(2026, 1, 11));
    let output = engine.generate(&employees, params).unwrap();

    let special_id = &employees[5].id;
    let working: Vec<_> = output
        .assignments
        .iter()
        .filter(|a| &a.employee_id == special_id && a.is_working())
        .collect();
    assert!(!working.is_empty());
    for a in &working {
        assert_eq!(a.entry, Some(time(9, 0)), "generic assignment kept");
    }
    assert!(output.stats.cell_errors >= 1);
}

#[test]
fn weekend_exclusion_rests_every_weekend_day() {
    let policy = small_policy();
    let catalog = ShiftCatalog::empty();
    let holidays = HolidayCalendar::empty();
    let (employees, specials) = team_with_special(vec![SpecialRule::ExcludeWeekends]);

    let mut engine = RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, 23);
    let params = RunParams::new(date(2026, 1, 5), date(2026, 1, 18));
    let output = engine.generate(&employees, params).unwrap();

    let special_id = &employees[5].id;
    for a in output.assignments.iter().filter(|a| &a.employee_id == special_id) {
        if matches!(a.date.weekday(), Weekday::Sat | Weekday::Sun) {
            assert!(a.rest, "excluded employee works on {}", a.date);
        }
    }
}

#[test]
fn holiday_exclusion_rests_on_the_holiday() {
    let policy = small_policy();
    let catalog = ShiftCatalog::empty();
    let holiday = date(2026, 1, 7); // miércoles
    let holidays = HolidayCalendar::from_entries(vec![Holiday {
        country: Country::CountryA,
        date: holiday,
    }]);
    let (employees, specials) = team_with_special(vec![SpecialRule::ExcludeHolidays]);

    let mut engine = RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, 29);
    let params = RunParams::new(date(2026, 1, 5), date(2026, 1, 11));
    let output = engine.generate(&employees, params).unwrap();

    let special_id = &employees[5].id;
    let cell = output
        .assignments
        .iter()
        .find(|a| &a.employee_id == special_id && a.date == holiday)
        .unwrap();
    assert!(cell.rest);
}
