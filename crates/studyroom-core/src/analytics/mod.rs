//! Productivity scoring and the aggregates behind the dashboard and
//! analytics views.
//!
//! Everything here is a pure function over task and session slices; scoping
//! to the signed-in user happens in the stores.

pub mod dashboard;
mod quotes;
pub mod report;
mod score;

pub use dashboard::{
    allocated_minutes, format_allocated, is_deadline_urgent, upcoming_deadlines,
    CompletionSummary, Dashboard, UpcomingDeadline,
};
pub use quotes::{random_quote, QUOTES};
pub use report::{
    category_distribution, completed_last_week, priority_distribution, weekly_productivity,
    AnalyticsReport, CategoryCount, DayProductivity, PriorityCount,
};
pub use score::{
    completion_rate, format_completion_rate, productivity_score, ProductivityLevel, Trend,
};
