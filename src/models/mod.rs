pub mod check_in;
pub mod duration;
pub mod raw_shift;
pub mod shift;
pub mod template;
pub mod work_info;

pub use duration::{Duration, DurationStyle, HoursDisplay};
pub use raw_shift::RawShift;
pub use shift::{ParseOutcome, Shift, ShiftDto, ShiftParams};
