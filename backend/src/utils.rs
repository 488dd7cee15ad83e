use shared::models::AggregateEntry;

pub const CSV_HEADER: &str = "word,yes_votes,no_votes";

/// Renders aggregates as `word,yes_votes,no_votes` CSV.
pub fn render_votes_csv(entries: &[AggregateEntry]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + entries.len() * 24);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&csv_field(&entry.word));
        out.push(',');
        out.push_str(&entry.yes_votes.to_string());
        out.push(',');
        out.push_str(&entry.no_votes.to_string());
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_and_rows() {
        let entries = vec![
            AggregateEntry { word: "cromulent".into(), yes_votes: 2, no_votes: 1 },
            AggregateEntry { word: "say \"what\", now".into(), yes_votes: 0, no_votes: 0 },
        ];
        assert_eq!(
            render_votes_csv(&entries),
            "word,yes_votes,no_votes\ncromulent,2,1\n\"say \"\"what\"\", now\",0,0\n"
        );
        assert_eq!(render_votes_csv(&[]), "word,yes_votes,no_votes\n");
    }
}
