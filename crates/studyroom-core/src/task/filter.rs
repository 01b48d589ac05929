//! Search, filtering and pagination for task lists.

use serde::Serialize;

use super::{Priority, Task, TaskCategory, TaskStatus};

/// Search criteria. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Case-insensitive substring of title or description.
    pub search: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<TaskCategory>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle);

        matches_search
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.category.map_or(true, |c| task.category == c)
    }

    pub fn apply<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}

/// Counts shown next to the calendar search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Tasks marked as missed.
    pub overdue: usize,
}

impl TaskStats {
    pub fn from_tasks<'a, I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Todo => stats.pending += 1,
                TaskStatus::Miss => stats.overdue += 1,
            }
            stats
        })
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice out a 1-based page. The requested page is clamped into
/// `1..=total_pages`; an empty list yields page 1 of 0.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(title: &str, status: TaskStatus, priority: Priority, category: TaskCategory) -> Task {
        let now = Utc::now();
        Task {
            id: title.to_string(),
            user_id: "u@x.edu".into(),
            title: title.to_string(),
            description: format!("details for {title}"),
            category,
            priority,
            status,
            deadline: None,
            start_time: None,
            end_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("Calculus homework", TaskStatus::Todo, Priority::High, TaskCategory::Study),
            task("Gym", TaskStatus::Completed, Priority::Low, TaskCategory::PersonalGrowth),
            task("Movie night", TaskStatus::Miss, Priority::Low, TaskCategory::Entertainment),
            task("Physics lab", TaskStatus::Todo, Priority::Medium, TaskCategory::Study),
        ]
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tasks = sample();
        let filter = TaskFilter {
            search: "CALC".into(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&tasks).len(), 1);

        let filter = TaskFilter {
            search: "details for gym".into(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&tasks)[0].title, "Gym");
    }

    #[test]
    fn criteria_combine() {
        let tasks = sample();
        let filter = TaskFilter {
            status: Some(TaskStatus::Todo),
            category: Some(TaskCategory::Study),
            priority: Some(Priority::Medium),
            ..Default::default()
        };
        let found = filter.apply(&tasks);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Physics lab");
    }

    #[test]
    fn default_filter_matches_everything() {
        let tasks = sample();
        assert_eq!(TaskFilter::default().apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn stats_count_each_status() {
        let stats = TaskStats::from_tasks(&sample());
        assert_eq!(
            stats,
            TaskStats {
                total: 4,
                completed: 1,
                pending: 2,
                overdue: 1
            }
        );
    }

    #[test]
    fn paginate_clamps_page() {
        let items: Vec<u32> = (1..=12).collect();
        let page = paginate(items.clone(), 3, 5);
        assert_eq!(page.items, vec![11, 12]);
        assert_eq!(page.total_pages, 3);

        let page = paginate(items.clone(), 99, 5);
        assert_eq!(page.page, 3);

        let page = paginate(items, 0, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.items, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn paginate_empty() {
        let page = paginate(Vec::<u32>::new(), 2, 5);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }
}
