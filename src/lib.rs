#![forbid(unsafe_code)]
//! Turnero — motor de generación de mallas de turnos 5x2 para call center.
//!
//! - Patrón 5x2 con tope de días consecutivos y lunes de dotación completa.
//! - Tablas horarias por país y tipo de día, feriados tratados como fin de
//!   semana.
//! - Casos especiales por empleado (turno fijo, rango horario, exclusiones).
//! - Balance de cobertura posterior con compensación en la misma semana.
//! - Todo en fechas civiles (`NaiveDate`); persistencia JSON/CSV fuera del
//!   motor.

pub mod calendar;
pub mod engine;
pub mod io;
pub mod model;
pub mod policy;
pub mod special;
pub mod storage;

pub use calendar::{Holiday, HolidayCalendar};
pub use engine::{EngineError, RosterEngine, RunOutput, RunParams, RunStats, WeeklyCompliance};
pub use model::{
    Assignment, CatalogSlot, Country, DayType, Employee, EmployeeId, EmploymentStatus, Plan,
    ShiftCatalog, ShiftCatalogEntry, ShiftKind,
};
pub use policy::Policy;
pub use special::{EmployeeMatch, SpecialCase, SpecialCaseRegistry, SpecialRule};
pub use storage::{JsonPlanStorage, PlanStorage};
