use std::fmt::Write;

use corelib::ExtremumKind;
use engine::{AnalysisOutcome, AnalysisReport};

/// Last events listed in the text report.
const RECENT_EVENTS: usize = 10;

pub fn json(outcome: &AnalysisOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Human-readable summary: dataset, windows, extrema and the most recent events.
pub fn text(outcome: &AnalysisOutcome) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, outcome)?;
    Ok(out)
}

fn write_report(out: &mut String, outcome: &AnalysisOutcome) -> std::fmt::Result {
    let AnalysisReport {
        samples_processed,
        windows_configured,
        windows,
        extrema,
        summary,
    } = &outcome.report;

    writeln!(out, "== dataset ==")?;
    writeln!(out, "records        {}", summary.total_records)?;
    match &summary.period {
        Some(p) => writeln!(out, "period         {} .. {}", p.start, p.end)?,
        None => writeln!(out, "period         -")?,
    }
    if summary.total_records > 0 {
        writeln!(
            out,
            "close          min {:.2}  max {:.2}  mean {:.2}",
            summary.min_price, summary.max_price, summary.mean_price
        )?;
        writeln!(out, "volume         {:.4}", summary.total_volume)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "== moving averages ({} of {} windows full, {} samples) ==",
        windows.len(),
        windows_configured,
        samples_processed
    )?;
    if windows.is_empty() {
        writeln!(out, "no window reached capacity")?;
    }
    for w in windows {
        writeln!(
            out,
            "{:<12} cap {:>5}  mean {:>12.2}  pushes {:>6}  snapshots {:>6}",
            w.name, w.capacity, w.mean, w.total_pushes, w.history_length
        )?;
    }

    writeln!(out)?;
    writeln!(out, "== extrema ==")?;
    writeln!(
        out,
        "peaks {}  valleys {}",
        extrema.total_peaks, extrema.total_valleys
    )?;
    if extrema.total_peaks > 0 || extrema.total_valleys > 0 {
        writeln!(
            out,
            "max peak {:.2}  min valley {:.2}  amplitude {:.2}",
            extrema.max_peak_price, extrema.min_valley_price, extrema.amplitude
        )?;
    }

    let skip = outcome.events.len().saturating_sub(RECENT_EVENTS);
    for e in &outcome.events[skip..] {
        let kind = match e.kind {
            ExtremumKind::Peak => "peak",
            ExtremumKind::Valley => "valley",
        };
        writeln!(out, "  #{:<6} {:<6} {:.2}", e.index, kind, e.price)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use corelib::Bar;
    use engine::AnalysisPipeline;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();

        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: start + chrono::TimeDelta::minutes(i as i64),
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 0.5,
            })
            .collect()
    }

    #[test]
    fn text_report_lists_full_windows_and_events() {
        let pipeline = AnalysisPipeline::new([("fast", 3), ("slow", 100)], 2).unwrap();
        let outcome = pipeline.run(&bars(&[1.0, 2.0, 3.0, 2.0, 1.0, 0.0, 1.0, 2.0, 3.0, 2.0, 1.0]));

        let s = text(&outcome).unwrap();

        assert!(s.contains("records        11"));
        assert!(s.contains("1 of 2 windows full"));
        assert!(s.contains("fast"));
        assert!(!s.contains("slow "));
        assert!(s.contains("peaks 2  valleys 1"));
        assert!(s.contains("amplitude 3.00"));
        assert!(s.contains("#5      valley 0.00"));
    }

    #[test]
    fn empty_dataset_renders_placeholders() {
        let pipeline = AnalysisPipeline::new([("w", 2)], 1).unwrap();
        let s = text(&pipeline.run(&[])).unwrap();

        assert!(s.contains("period         -"));
        assert!(s.contains("no window reached capacity"));
        assert!(s.contains("peaks 0  valleys 0"));
    }

    #[test]
    fn json_output_carries_report_histories_and_events() {
        let pipeline = AnalysisPipeline::new([("w", 2)], 1).unwrap();
        let outcome = pipeline.run(&bars(&[1.0, 3.0, 2.0]));

        let v: serde_json::Value = serde_json::from_str(&json(&outcome).unwrap()).unwrap();

        assert_eq!(v["report"]["samples_processed"], 3);
        assert_eq!(v["histories"][0]["name"], "w");
        assert_eq!(v["histories"][0]["snapshots"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(v["events"][0]["kind"], "peak");
    }
}
