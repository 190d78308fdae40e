use crate::models::{Record, Summary};

/// Shortest round-trip decimal, always with a fractional part ("0.0", "-0.9", "0.0667").
pub fn fmt_score(x: f64) -> String {
    let s = x.to_string();
    if x.is_finite() && !s.contains('.') {
        format!("{}.0", s)
    } else {
        s
    }
}

pub fn render_summary(s: &Summary) -> String {
    let mut out = String::new();
    out.push_str("--- Sentiment Summary ---\n");
    out.push_str(&format!("Items:        {}\n", s.count));
    out.push_str(&format!("Avg compound: {}\n", fmt_score(s.avg_compound)));
    out.push_str(&format!("Positive:     {}\n", s.positive));
    out.push_str(&format!("Neutral:      {}\n", s.neutral));
    out.push_str(&format!("Negative:     {}\n", s.negative));
    out
}

fn push_extreme_lines(out: &mut String, heading: &str, rows: &[&Record]) {
    out.push_str(&format!("\n{}\n", heading));
    for r in rows {
        out.push_str(&format!(
            "  {:>8} {:>6} - {}\n",
            r.label,
            fmt_score(r.compound),
            r.url
        ));
    }
}

/// Summary block, then the extremes lists when there is at least one record.
pub fn render_console(s: &Summary, worst: &[&Record], best: &[&Record]) -> String {
    let mut out = render_summary(s);
    if s.count > 0 {
        push_extreme_lines(&mut out, "Most Negative:", worst);
        push_extreme_lines(&mut out, "Most Positive:", best);
    }
    out
}
