//! Markdown overview of a report summary

use std::fmt::Write;

use crate::config::PresentationMode;
use crate::summary::{ReportSummary, Status, StepSummary};

fn marker(status: Status) -> &'static str {
    match status {
        Status::Passed => "[PASS]",
        Status::Failed => "[FAIL]",
        Status::Skipped => "[SKIP]",
    }
}

fn write_step(out: &mut String, step: &StepSummary) {
    let _ = writeln!(
        out,
        "- {} {} {} ({} ms)",
        marker(step.status),
        step.keyword,
        step.name,
        step.duration_ms
    );
    if let Some(error) = &step.error_message {
        let _ = writeln!(out, "\n  ```text");
        for line in error.lines() {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(out, "  ```");
    }
    if !step.output.is_empty() {
        let _ = writeln!(out, "\n  Output:\n\n  ```text");
        for line in &step.output {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(out, "  ```");
    }
}

/// Render the overview page
pub fn render_overview(summary: &ReportSummary, mode: PresentationMode) -> String {
    let mut out = String::new();
    let totals = &summary.totals;

    let _ = writeln!(out, "# {} (build {})", summary.project_name, summary.build_number);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated {} - overall status: **{}**",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.status().label()
    );

    if !summary.classifications.is_empty() {
        let _ = writeln!(out, "\n| Classification | Value |\n|---|---|");
        for classification in &summary.classifications {
            let _ = writeln!(out, "| {} | {} |", classification.name, classification.value);
        }
    }

    let _ = writeln!(out, "\n## Summary\n");
    let _ = writeln!(out, "| | Total | Passed | Failed | Skipped |\n|---|---|---|---|---|");
    let _ = writeln!(
        out,
        "| Scenarios | {} | {} | {} | {} |",
        totals.scenarios, totals.passed_scenarios, totals.failed_scenarios, totals.skipped_scenarios
    );
    let _ = writeln!(
        out,
        "| Steps | {} | {} | {} | {} |",
        totals.steps, totals.passed_steps, totals.failed_steps, totals.skipped_steps
    );
    let _ = writeln!(out, "\nFeatures: {}, duration: {} ms", totals.features, totals.duration_ms);

    for feature in &summary.features {
        let _ = writeln!(out, "\n## {} {}", marker(feature.status), feature.name);
        if let Some(uri) = &feature.uri {
            let _ = writeln!(out, "\n`{}`", uri);
        }

        for scenario in &feature.scenarios {
            let _ = writeln!(out, "\n### {} {}", marker(scenario.status), scenario.name);
            if !scenario.tags.is_empty() {
                let _ = writeln!(out, "\nTags: {}", scenario.tags.join(" "));
            }
            let _ = writeln!(out);

            let steps = scenario.steps.iter().filter(|step| {
                mode == PresentationMode::ExpandAllSteps || step.status == Status::Failed
            });
            for step in steps {
                write_step(&mut out, step);
            }
        }
    }

    out
}
