//! Rendering of run reports and presets.

use crate::environment::EnvironmentInfo;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use load_generator::{Preset, RunReport};
use serde::Serialize;

/// Everything the JSON output carries.
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub environment: &'a EnvironmentInfo,
    pub report: &'a RunReport,
}

/// Format a report as a per-unit table followed by totals.
pub fn format_table(report: &RunReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Unit", "Delay", "Planned", "Completed", "Failed", "Status"]);

    for unit in &report.units {
        let status_cell = if unit.failed == 0 && unit.completed == unit.iterations {
            Cell::new("OK").fg(Color::Green)
        } else if unit.failed > 0 {
            Cell::new("FAILED").fg(Color::Red)
        } else {
            Cell::new("PARTIAL").fg(Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(unit.unit_id),
            Cell::new(format!("{}ms", unit.delay_ms)),
            Cell::new(format_number(unit.iterations)),
            Cell::new(format_number(unit.completed)),
            Cell::new(format_number(unit.failed)),
            status_cell,
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format!("{}ms*", report.max_delay().as_millis())),
        Cell::new(format_number(report.planned_rounds())),
        Cell::new(format_number(report.completed_rounds)),
        Cell::new(format_number(report.failed_rounds)),
        Cell::new(format!("{:.1} rounds/s", report.rounds_per_second())),
    ]);

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n* Longest unit delay; run took {}ms ({} policy, {} mode)\n",
        report.elapsed_ms, report.policy, report.mode
    ));
    output
}

/// Format the built-in presets as a table.
pub fn format_presets() -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Preset", "Units", "Rounds", "Delay"]);

    for preset in Preset::ALL {
        let request = preset.request();
        table.add_row(vec![
            Cell::new(preset),
            Cell::new(request.unit_count),
            Cell::new(format!("{}..{}", request.iter_min, request.iter_max)),
            Cell::new(format!(
                "{}ms..{}ms",
                request.delay_min.as_millis(),
                request.delay_max.as_millis()
            )),
        ]);
    }

    table.to_string()
}

/// Format number with thousands separators.
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    out.push_str(&digits[..head]);
    for group in digits.as_bytes()[head..].chunks(3) {
        if !out.is_empty() {
            out.push(',');
        }
        // ASCII digits only
        out.extend(group.iter().map(|&b| b as char));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use load_generator::{FailurePolicy, RoundMode, UnitReport};

    fn report() -> RunReport {
        let now = chrono::Utc::now();
        RunReport {
            started_at: now,
            completed_at: now,
            elapsed_ms: 1500,
            policy: FailurePolicy::Lenient,
            mode: RoundMode::Nested,
            completed_rounds: 1180,
            failed_rounds: 20,
            units: vec![
                UnitReport {
                    unit_id: 0,
                    delay_ms: 120,
                    delay_ns: 120_000_000,
                    iterations: 200,
                    completed: 200,
                    failed: 0,
                },
                UnitReport {
                    unit_id: 1,
                    delay_ms: 280,
                    delay_ns: 280_000_000,
                    iterations: 1000,
                    completed: 980,
                    failed: 20,
                },
            ],
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_table() {
        let output = format_table(&report());
        assert!(output.contains("TOTAL"));
        assert!(output.contains("FAILED"));
        assert!(output.contains("1,180"));
        assert!(output.contains("280ms*"));
        assert!(output.contains("lenient policy"));
    }

    #[test]
    fn test_format_presets() {
        let output = format_presets();
        assert!(output.contains("quick"));
        assert!(output.contains("100..200"));
        assert!(output.contains("1000ms..2000ms"));
    }

    #[test]
    fn test_json_output() {
        let report = report();
        let environment = EnvironmentInfo {
            cpu_cores: 4,
            memory_mb: 8192,
            available_memory_mb: 4096,
        };
        let json = serde_json::to_value(RunOutput {
            environment: &environment,
            report: &report,
        })
        .unwrap();
        assert_eq!(json["environment"]["cpu_cores"], 4);
        assert_eq!(json["report"]["completed_rounds"], 1180);
        assert_eq!(json["report"]["mode"], "nested");
    }
}
