mod grid;
mod range;
mod state;
mod util;
mod widget;
pub(crate) use self::range::DateRange;
pub(crate) use self::state::CalendarState;
pub(crate) use self::util::{long_date, DateKey, WeekStart};
pub(crate) use self::widget::{Calendar, CALENDAR_HEIGHT};
