use crate::engine::ScoreBand;
use crate::types::record::UserRecord;

pub fn to_markdown(user: &UserRecord) -> String {
    let mut output = String::new();
    output.push_str("# Academic History\n\n");
    output.push_str(&format!(
        "Student: {} ({}){}\n\n",
        user.name,
        user.register_number,
        if user.is_guest { " [guest, stored locally]" } else { "" }
    ));

    output.push_str("## Semester GPA\n\n");
    if user.history.periods.is_empty() {
        output.push_str("- none\n\n");
    } else {
        let mut periods = user.history.periods.iter().collect::<Vec<_>>();
        periods.sort_by(|a, b| b.period.cmp(&a.period));
        for record in periods {
            output.push_str(&format!(
                "- [{}] Sem {} {}: {:.2} ({}, {} subjects, {})\n",
                record.id,
                record.period,
                record.stream,
                record.score,
                ScoreBand::of(record.score).label(),
                record.subjects.len(),
                record.created_at.format("%Y-%m-%d")
            ));
        }
        output.push('\n');
    }

    output.push_str("## Cumulative CGPA\n\n");
    if user.history.cumulatives.is_empty() {
        output.push_str("- none\n");
    } else {
        for record in &user.history.cumulatives {
            output.push_str(&format!(
                "- [{}] {} semesters: {:.2} ({}, {})\n",
                record.id,
                record.periods_covered,
                record.score,
                ScoreBand::of(record.score).label(),
                record.created_at.format("%Y-%m-%d")
            ));
        }
    }

    output
}
