//! Markdown report rendering

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::session::{LogEntry, Observation, Phase, SessionInfo};
use crate::common::{paths, Result};

const MAX_SUFFIX: u32 = 1000;

/// Read-only snapshot of a session, taken when the run ends
#[derive(Debug, Clone)]
pub struct Report {
    pub session: SessionInfo,
    pub started_at: DateTime<Local>,
    pub completed_at: DateTime<Local>,
    pub duration_secs: f64,
    pub success_rate: f64,
    pub phases: Vec<Phase>,
    pub observations: Vec<Observation>,
    pub logs: Vec<LogEntry>,
}

/// Qualitative outcome bucketed by success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 90% and above
    Pass,
    /// 70% and above
    Partial,
    Fail,
}

impl Verdict {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 90.0 {
            Verdict::Pass
        } else if rate >= 70.0 {
            Verdict::Partial
        } else {
            Verdict::Fail
        }
    }

    fn recommendation(self) -> &'static str {
        match self {
            Verdict::Pass => "✅ **Test passed** - The workflow behaves as expected.",
            Verdict::Partial => {
                "⚠️ **Test partially passed** - A few minor issues need fixing."
            }
            Verdict::Fail => {
                "❌ **Test failed** - Critical issues need immediate attention."
            }
        }
    }
}

impl Report {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_rate(self.success_rate)
    }

    /// Render the full Markdown document
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_markdown(&mut out);
        out
    }

    fn write_markdown(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "# {}\n", self.session.name)?;

        let mut meta = vec![
            format!("**Test ID**: {}", self.session.id),
            format!("**Date**: {}", self.completed_at.format("%Y-%m-%d %H:%M:%S")),
            format!("**Duration**: {:.2}s", self.duration_secs),
            format!("**Success rate**: {:.1}%", self.success_rate),
        ];
        if let Some(estimate) = &self.session.estimated_duration {
            meta.push(format!("**Estimated duration**: {}", estimate));
        }
        if !self.session.modules_tested.is_empty() {
            meta.push(format!(
                "**Modules tested**: {}",
                self.session.modules_tested.join(", ")
            ));
        }
        // Two trailing spaces force Markdown line breaks
        writeln!(out, "{}\n", meta.join("  \n"))?;

        writeln!(out, "## Description\n\n{}\n", self.session.description)?;

        writeln!(out, "## Phases Executed\n")?;
        for phase in &self.phases {
            writeln!(out, "- {}", phase.name)?;
        }

        writeln!(out, "\n## Observations\n")?;
        for obs in &self.observations {
            writeln!(out, "- **Q**: {}", obs.question)?;
            writeln!(out, "  **R**: {}\n", obs.response)?;
        }

        writeln!(out, "\n## Logs\n\n```")?;
        for log in &self.logs {
            writeln!(
                out,
                "[{}] [{}] {}",
                log.at.format("%H:%M:%S"),
                log.kind,
                log.message
            )?;
        }
        writeln!(out, "```")?;

        writeln!(out, "\n## Recommendations\n")?;
        writeln!(out, "{}", self.verdict().recommendation())
    }

    /// Write the report to `<dir>/<session-id>_<timestamp>.md`
    ///
    /// An existing file is never replaced; a second report from the same
    /// second gets a `_2`, `_3`, ... suffix.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        paths::ensure_dir(dir)?;
        let base = paths::report_path(dir, &self.session.id, self.completed_at);
        let markdown = self.to_markdown();

        let mut path = base.clone();
        let mut n = 1;
        let mut file = loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists && n < MAX_SUFFIX => {
                    n += 1;
                    path = paths::numbered(&base, n);
                }
                Err(e) => return Err(e.into()),
            }
        };
        file.write_all(markdown.as_bytes())?;
        tracing::debug!(path = %path.display(), "Report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::session::LogKind;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 10, 20, h, m, s).unwrap()
    }

    fn sample() -> Report {
        let mut session = SessionInfo::new("E2E_001", "Cart Guard Workflow", "Checkout gating");
        session.modules_tested = vec!["CartGuard".into(), "CartRestriction".into()];
        Report {
            session,
            started_at: at(9, 0, 0),
            completed_at: at(9, 12, 30),
            duration_secs: 750.0,
            success_rate: 75.0,
            phases: vec![
                Phase {
                    name: "Phase 1".into(),
                    started_at: at(9, 0, 1),
                },
                Phase {
                    name: "Phase 2".into(),
                    started_at: at(9, 5, 0),
                },
            ],
            observations: vec![Observation {
                question: "Is the button visible?".into(),
                response: "yes".into(),
                at: at(9, 6, 0),
            }],
            logs: vec![
                LogEntry {
                    kind: LogKind::Success,
                    message: "Plugin active → OK".into(),
                    at: at(9, 0, 2),
                },
                LogEntry {
                    kind: LogKind::Error,
                    message: "Mapping → TIMEOUT".into(),
                    at: at(9, 0, 40),
                },
            ],
        }
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_rate(100.0), Verdict::Pass);
        assert_eq!(Verdict::from_rate(90.0), Verdict::Pass);
        assert_eq!(Verdict::from_rate(89.9), Verdict::Partial);
        assert_eq!(Verdict::from_rate(70.0), Verdict::Partial);
        assert_eq!(Verdict::from_rate(69.9), Verdict::Fail);
        assert_eq!(Verdict::from_rate(0.0), Verdict::Fail);
    }

    #[test]
    fn markdown_has_all_sections_in_order() {
        let md = sample().to_markdown();
        let order = [
            "# Cart Guard Workflow",
            "**Test ID**: E2E_001  \n",
            "**Date**: 2025-10-20 09:12:30",
            "**Duration**: 750.00s",
            "**Success rate**: 75.0%",
            "**Modules tested**: CartGuard, CartRestriction",
            "## Description\n\nCheckout gating",
            "## Phases Executed\n\n- Phase 1\n- Phase 2\n",
            "## Observations",
            "- **Q**: Is the button visible?\n  **R**: yes\n",
            "## Logs",
            "[09:00:02] [SUCCESS] Plugin active → OK\n[09:00:40] [ERROR] Mapping → TIMEOUT\n```",
            "## Recommendations",
            "⚠️ **Test partially passed**",
        ];
        let mut cursor = 0;
        for needle in order {
            let found = md[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("'{}' missing or out of order in:\n{}", needle, md));
            cursor += found + needle.len();
        }
        assert!(!md.contains("Estimated duration"));
    }

    #[test]
    fn write_to_uses_session_id_and_completion_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample().write_to(&dir.path().join("nested")).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "E2E_001_20251020_091230.md"
        );
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Cart Guard Workflow\n"));
    }

    #[test]
    fn same_second_reports_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();
        let first = report.write_to(dir.path()).unwrap();

        let mut later = sample();
        later.session.name = "Second run".to_string();
        let second = later.write_to(dir.path()).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_str().unwrap(),
            "E2E_001_20251020_091230_2.md"
        );
        assert!(std::fs::read_to_string(&first)
            .unwrap()
            .starts_with("# Cart Guard Workflow\n"));
        assert!(std::fs::read_to_string(&second)
            .unwrap()
            .starts_with("# Second run\n"));
    }
}
