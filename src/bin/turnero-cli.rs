#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use turnero::{
    io,
    model::{Plan, ShiftCatalog},
    policy::Policy,
    special::SpecialCaseRegistry,
    storage::{JsonPlanStorage, PlanStorage},
    HolidayCalendar, RosterEngine, RunParams,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de generación de mallas de turnos (sin base de datos)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Activa los logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Archivo JSON de la malla
    #[arg(long, global = true, default_value = "plan.json")]
    plan: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generar la malla para un rango de fechas
    Generate {
        /// Fecha inicial (YYYY-MM-DD, inclusiva)
        #[arg(long)]
        start: String,
        /// Fecha final (YYYY-MM-DD, inclusiva)
        #[arg(long)]
        end: String,
        /// CSV de empleados: id,name,country,status[,campaign]
        #[arg(long)]
        employees: String,
        /// JSON de política; ausente usa los defaults
        #[arg(long)]
        policy: Option<String>,
        /// JSON de tabla horaria; ausente usa el horario por defecto
        #[arg(long)]
        catalog: Option<String>,
        /// JSON de feriados
        #[arg(long)]
        holidays: Option<String>,
        /// JSON de casos especiales
        #[arg(long)]
        specials: Option<String>,
        /// Semilla para corridas reproducibles
        #[arg(long)]
        seed: Option<u64>,
        /// Export CSV de las asignaciones generadas
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Verificar invariantes de una malla guardada
    Check {
        /// Export CSV de las violaciones (opcional)
        #[arg(long)]
        report: Option<String>,
        #[arg(long, default_value_t = 6)]
        max_consecutive: u32,
    },

    /// Exportar la malla guardada
    Export {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonPlanStorage::open(&cli.plan)?;
    let mut plan = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::Generate {
            start,
            end,
            employees,
            policy,
            catalog,
            holidays,
            specials,
            seed,
            out_csv,
        } => {
            let start: NaiveDate = start.parse()?;
            let end: NaiveDate = end.parse()?;
            let employees = io::import_employees_csv(employees)?;
            if employees.is_empty() {
                bail!("empty employee list");
            }

            let policy = match policy {
                Some(path) => Policy::load_from_file(path)?,
                None => Policy::default(),
            };
            let catalog = match catalog {
                Some(path) => ShiftCatalog::load_from_file(path)?,
                None => ShiftCatalog::empty(),
            };
            let holidays = match holidays {
                Some(path) => HolidayCalendar::load_from_file(path)?,
                None => HolidayCalendar::empty(),
            };
            let specials = match specials {
                Some(path) => SpecialCaseRegistry::load_from_file(path)?,
                None => SpecialCaseRegistry::empty(),
            };

            let mut engine = match seed {
                Some(seed) => RosterEngine::with_seed(&policy, &catalog, &holidays, &specials, seed),
                None => RosterEngine::new(&policy, &catalog, &holidays, &specials),
            };
            let output = engine.generate(&employees, RunParams::new(start, end))?;

            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &output.assignments)?;
            }
            plan.replace_range(output.assignments, start, end);
            storage.save(&plan)?;

            let s = &output.stats;
            println!(
                "{} días × {} empleados: {} trabajo / {} descanso | fin de semana {} | reducidos {} | flips {} | excesos de cupo {} | errores de celda {}",
                s.days,
                s.employees,
                s.workdays,
                s.restdays,
                s.weekend_workdays,
                s.reduced_days,
                s.coverage_flips,
                s.quota_overruns,
                s.cell_errors
            );
            0
        }

        Commands::Check {
            report,
            max_consecutive,
        } => {
            let violations = check_plan(&plan, max_consecutive);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["employee_id", "date", "kind"])?;
                    for v in &violations {
                        w.write_record([v.employee_id.as_str(), v.date.as_str(), v.kind])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }

        Commands::Export { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_plan_json(path, &plan)?;
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &plan.assignments)?;
            }
            for a in &plan.assignments {
                let horario = match (a.entry, a.exit) {
                    (Some(entry), Some(exit)) => format!("{entry} → {exit}"),
                    _ => "descanso".to_string(),
                };
                println!("{} | {} | {}", a.employee_id.as_str(), a.date, horario);
            }
            0
        }
    };

    std::process::exit(code);
}

struct Violation {
    employee_id: String,
    date: String,
    kind: &'static str,
}

/// Reglas verificables sin re-generar: celdas duplicadas, lunes de descanso,
/// racha sobre el tope y más de una jornada reducida por semana.
fn check_plan(plan: &Plan, max_consecutive: u32) -> Vec<Violation> {
    let mut out = Vec::new();

    let mut seen: HashMap<(&str, NaiveDate), u32> = HashMap::new();
    for a in &plan.assignments {
        *seen.entry((a.employee_id.as_str(), a.date)).or_insert(0) += 1;
        if a.date.weekday() == Weekday::Mon && a.rest {
            out.push(Violation {
                employee_id: a.employee_id.as_str().to_string(),
                date: a.date.to_string(),
                kind: "monday_rest",
            });
        }
    }
    for ((id, date), count) in &seen {
        if *count > 1 {
            out.push(Violation {
                employee_id: (*id).to_string(),
                date: date.to_string(),
                kind: "duplicate_cell",
            });
        }
    }

    // Rachas y reducciones por empleado, en orden de fecha.
    let mut by_employee: HashMap<&str, Vec<&turnero::Assignment>> = HashMap::new();
    for a in &plan.assignments {
        by_employee.entry(a.employee_id.as_str()).or_default().push(a);
    }
    for (id, mut cells) in by_employee {
        cells.sort_by_key(|a| a.date);
        let mut run = 0u32;
        let mut reduced_by_week: HashMap<(i32, u32), u32> = HashMap::new();
        for a in cells {
            if a.rest {
                run = 0;
            } else {
                run += 1;
                if run > max_consecutive {
                    out.push(Violation {
                        employee_id: id.to_string(),
                        date: a.date.to_string(),
                        kind: "consecutive_overrun",
                    });
                }
                if a.reduced {
                    let week = a.date.iso_week();
                    let count = reduced_by_week
                        .entry((week.year(), week.week()))
                        .or_insert(0);
                    *count += 1;
                    if *count > 1 {
                        out.push(Violation {
                            employee_id: id.to_string(),
                            date: a.date.to_string(),
                            kind: "multiple_reduced_days",
                        });
                    }
                }
            }
        }
    }

    out
}
