use crate::models::{SortMode, Task};
use std::cmp::Ordering;

/// Order tasks in place. The sort is stable, so tasks with identical keys
/// keep their scan order.
pub fn sort_tasks(tasks: &mut [Task], mode: SortMode) {
    match mode {
        SortMode::File => tasks.sort_by(by_location),
        SortMode::Marker => tasks.sort_by(|a, b| {
            a.marker
                .priority()
                .cmp(&b.marker.priority())
                .then_with(|| by_location(a, b))
        }),
    }
}

fn by_location(a: &Task, b: &Task) -> Ordering {
    a.file_path
        .cmp(&b.file_path)
        .then(a.line_number.cmp(&b.line_number))
}
