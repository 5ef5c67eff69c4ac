// ABOUTME: Self-contained HTML rendering of a validated training plan
// ABOUTME: Escapes all model-provided text to prevent markup injection
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use html_escape::encode_text;

use crate::models::{DailyPlan, MealSlot, RunningPlan};

/// Render a validated plan as a self-contained HTML document
///
/// Deterministic: the same plan always produces the same document. Every
/// piece of model-provided text passes through `html_escape` before it
/// reaches the markup.
#[must_use]
pub fn render_html(plan: &RunningPlan) -> String {
    let mut weeks_html = String::new();
    for (week_idx, week) in plan.plan.iter().enumerate() {
        let mut days_html = String::new();
        for daily in week {
            days_html.push_str(&render_day(daily));
        }
        weeks_html.push_str(&format!(
            r#"    <section class="week">
      <h2>Week {week_number}</h2>
{days_html}    </section>
"#,
            week_number = week_idx + 1,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Training Plan</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; color: #222; }}
        .intro {{ background-color: #f8f9fa; padding: 15px; border-radius: 8px; margin-bottom: 20px; }}
        .week {{ margin-bottom: 30px; }}
        .day {{ border: 1px solid #ddd; border-radius: 8px; padding: 15px; margin-bottom: 10px; }}
        .day h3 {{ margin-top: 0; }}
        .meals {{ list-style: none; padding-left: 0; }}
        .meals li {{ margin-bottom: 4px; }}
        .slot {{ font-weight: bold; text-transform: capitalize; }}
    </style>
</head>
<body>
    <h1>Your Training Plan</h1>
    <div class="intro">
        <p class="motivation">{motivation}</p>
        <p class="feedback">{feedback}</p>
        <p class="supplements">{supplements}</p>
    </div>
{weeks_html}</body>
</html>
"#,
        motivation = encode_text(&plan.motivation),
        feedback = encode_text(&plan.feedback),
        supplements = encode_text(&plan.supplement_suggestion),
    )
}

fn render_day(daily: &DailyPlan) -> String {
    let mut meals_html = String::new();
    for slot in MealSlot::ALL {
        let meal = daily.meal(slot);
        meals_html.push_str(&format!(
            r#"          <li><span class="slot">{slot}</span>: {suggestion} ({calories})</li>
"#,
            suggestion = encode_text(&meal.suggestion),
            calories = encode_text(&meal.calories),
        ));
    }

    format!(
        r#"      <div class="day">
        <h3>{day}: {titles}</h3>
        <p>{details}</p>
        <ul class="meals">
{meals_html}        </ul>
      </div>
"#,
        day = encode_text(&daily.day),
        titles = encode_text(&daily.titles),
        details = encode_text(&daily.details),
    )
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_plan;
    use super::*;

    #[test]
    fn test_renders_one_block_per_day() {
        let html = render_html(&sample_plan(8, 7));
        assert_eq!(html.matches(r#"<div class="day">"#).count(), 56);
        assert_eq!(html.matches(r#"<section class="week">"#).count(), 8);
        assert!(html.contains("Week 8"));
    }

    #[test]
    fn test_escapes_markup_sensitive_text() {
        let mut plan = sample_plan(1, 1);
        plan.plan[0][0].breakfast.suggestion = "<script>alert('x')</script> & eggs".to_owned();
        let html = render_html(&plan);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; eggs"));
    }

    #[test]
    fn test_deterministic() {
        let plan = sample_plan(2, 3);
        assert_eq!(render_html(&plan), render_html(&plan));
    }
}
