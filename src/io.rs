use crate::model::{Assignment, Country, Employee, EmployeeId, EmploymentStatus, Plan};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de empleados desde CSV: header `id,name,country,status[,campaign]`.
/// Un id vacío genera uno aleatorio.
pub fn import_employees_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let country = rec.get(2).context("missing country")?.trim();
        let status = rec.get(3).context("missing status")?.trim();
        if name.is_empty() {
            bail!("invalid employee row (empty name)");
        }
        let mut employee = Employee::new(name.to_string(), Country::parse(country)?);
        if !id.is_empty() {
            employee.id = EmployeeId::new(id);
        }
        employee.status = EmploymentStatus::parse(status)
            .with_context(|| format!("invalid status for employee {name}"))?;
        if let Some(campaign) = rec.get(4) {
            let campaign = campaign.trim();
            if !campaign.is_empty() {
                employee.campaign = Some(campaign.to_string());
            }
        }
        out.push(employee);
    }
    Ok(out)
}

/// Export JSON de la malla (con formato legible)
pub fn export_plan_json<P: AsRef<Path>>(path: P, plan: &Plan) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(plan)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de asignaciones: header
/// `employee_id,date,rest,entry,exit,break1,meal,break2,kind,reduced`.
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    assignments: &[Assignment],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "employee_id",
        "date",
        "rest",
        "entry",
        "exit",
        "break1",
        "meal",
        "break2",
        "kind",
        "reduced",
    ])?;
    for a in assignments {
        let fmt = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
        };
        w.write_record([
            a.employee_id.as_str().to_string(),
            a.date.to_string(),
            a.rest.to_string(),
            fmt(a.entry),
            fmt(a.exit),
            fmt(a.break1),
            fmt(a.meal),
            fmt(a.break2),
            a.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
            a.reduced.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
