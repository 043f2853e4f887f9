use crate::model::{Assignment, Employee};
use chrono::NaiveDate;

/// Arena empleado × día. Cada celda nace como descanso y los pases la
/// reescriben en sitio, lo que mantiene las ediciones auditables y
/// garantiza una celda por (empleado, fecha) sin huecos ni duplicados.
#[derive(Debug, Clone)]
pub(super) struct PlanGrid {
    pub employees: Vec<Employee>,
    pub dates: Vec<NaiveDate>,
    cells: Vec<Assignment>,
}

impl PlanGrid {
    pub fn new(employees: Vec<Employee>, start: NaiveDate, end: NaiveDate) -> Self {
        let mut dates = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            dates.push(cursor);
            match cursor.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }

        let mut cells = Vec::with_capacity(employees.len() * dates.len());
        for employee in &employees {
            for &date in &dates {
                cells.push(Assignment::rest_day(employee.id.clone(), date));
            }
        }
        Self {
            employees,
            dates,
            cells,
        }
    }

    pub fn num_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn num_days(&self) -> usize {
        self.dates.len()
    }

    pub fn date(&self, d: usize) -> NaiveDate {
        self.dates[d]
    }

    fn idx(&self, e: usize, d: usize) -> usize {
        e * self.dates.len() + d
    }

    pub fn cell(&self, e: usize, d: usize) -> &Assignment {
        &self.cells[self.idx(e, d)]
    }

    pub fn cell_mut(&mut self, e: usize, d: usize) -> &mut Assignment {
        let idx = self.idx(e, d);
        &mut self.cells[idx]
    }

    /// Dotación trabajando en el día `d`.
    pub fn day_work_count(&self, d: usize) -> u32 {
        (0..self.num_employees())
            .filter(|&e| self.cell(e, d).is_working())
            .count() as u32
    }

    pub fn into_assignments(self) -> Vec<Assignment> {
        self.cells
    }
}
