use crate::model::Task;
use crate::recur::parse_date;

fn display_date(date: &str) -> String {
    match parse_date(date) {
        Ok(d) => d.format("%d.%m.%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

pub fn format_task_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks\n".to_string();
    }
    let mut out = String::new();
    for task in tasks {
        let repeat_info = if task.repeat.is_empty() {
            String::new()
        } else {
            format!("  (repeats: {})", task.repeat)
        };
        out.push_str(&format!(
            "{:>4}  {}  {}{}\n",
            task.id,
            display_date(&task.date),
            task.title,
            repeat_info
        ));
    }
    out
}

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:      {}\n", task.id));
    out.push_str(&format!("Date:    {}\n", display_date(&task.date)));
    out.push_str(&format!("Title:   {}\n", task.title));
    if !task.comment.is_empty() {
        out.push_str(&format!("Comment: {}\n", task.comment));
    }
    if !task.repeat.is_empty() {
        out.push_str(&format!("Repeats: {}\n", task.repeat));
    }
    out
}
