use chrono::NaiveDate;

/// Contadores por empleado. Los semanales se reinician el lunes,
/// los mensuales el día 1. La racha de días trabajados cruza semanas.
#[derive(Debug, Clone, Default)]
pub(super) struct WeekState {
    pub consecutive_workdays: u32,
    pub workdays: u8,
    pub restdays: u8,
    pub weekend_rests: u8,
    pub last_restday: Option<NaiveDate>,
    pub rest_sundays_month: u8,
    pub free_weekends_month: u8,
}

impl WeekState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roll_week(&mut self) {
        self.workdays = 0;
        self.restdays = 0;
        self.weekend_rests = 0;
    }

    pub fn roll_month(&mut self) {
        self.rest_sundays_month = 0;
        self.free_weekends_month = 0;
    }

    pub fn record_work(&mut self) {
        self.workdays += 1;
        self.consecutive_workdays += 1;
    }

    pub fn record_rest(&mut self, date: NaiveDate, weekend: bool, sunday: bool) {
        if sunday {
            self.rest_sundays_month += 1;
            // sábado + domingo libres cuentan como fin de semana libre
            if self.last_restday == date.pred_opt() {
                self.free_weekends_month += 1;
            }
        }
        self.restdays += 1;
        self.consecutive_workdays = 0;
        self.last_restday = Some(date);
        if weekend {
            self.weekend_rests += 1;
        }
    }
}
