use crate::domain::model::{DuplicateReport, ReportFormat};
use crate::utils::error::{DupError, Result};
use std::fmt::Write as _;

pub fn render(report: &DuplicateReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Csv => render_csv(report),
    }
}

pub fn render_text(report: &DuplicateReport) -> String {
    let mut out = String::new();

    for dup in &report.duplicates {
        let _ = writeln!(
            out,
            "{}. Duplicate found! [{}] \n\t[{} - {}]",
            dup.index,
            dup.metadata,
            dup.original.display(),
            dup.duplicate.display()
        );
        if report.is_deleted(&dup.duplicate) {
            let verb = if report.dry_run {
                "Would delete"
            } else {
                "Deleting"
            };
            let _ = writeln!(out, "{} {}", verb, dup.duplicate.display());
        }
    }

    for failure in &report.delete_failures {
        let _ = writeln!(
            out,
            "[Error] Could not delete {}: {}",
            failure.path.display(),
            failure.reason
        );
    }

    let _ = write!(
        out,
        "\nSummary:\n\tduplicates={}\n\twasted space={:.2}kb\n",
        report.duplicate_count(),
        report.wasted_space_kb()
    );

    if !report.files_skipped.is_empty()
        || !report.denied_dirs.is_empty()
        || !report.unreadable_dirs.is_empty()
    {
        let _ = writeln!(
            out,
            "\tskipped files={}\n\tdenied directories={}\n\tunreadable directories={}",
            report.files_skipped.len(),
            report.denied_dirs.len(),
            report.unreadable_dirs.len()
        );
    }

    out
}

pub fn render_csv(report: &DuplicateReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["index", "md5", "size", "original", "duplicate", "deleted"])?;

    for dup in &report.duplicates {
        writer.write_record([
            dup.index.to_string(),
            dup.md5.clone(),
            dup.metadata.size.to_string(),
            dup.original.display().to_string(),
            dup.duplicate.display().to_string(),
            (report.is_deleted(&dup.duplicate) && !report.dry_run).to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DupError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| DupError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Duplicate, FileMetadata};
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn sample_report() -> DuplicateReport {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        DuplicateReport {
            root: PathBuf::from("/data"),
            duplicates: vec![Duplicate {
                index: 1,
                md5: "5d41402abc4b2a76b9719d911017c592".to_string(),
                original: PathBuf::from("/data/a.txt"),
                duplicate: PathBuf::from("/data/sub/a.txt"),
                metadata: FileMetadata::new(1536, modified, None),
            }],
            wasted_space: 1536,
            files_indexed: 3,
            files_hashed: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&sample_report());

        assert_eq!(
            text,
            "1. Duplicate found! [FileMetadata: size=1.50kb created=n/a modified=2020-09-13 12:26:40] \n\
             \t[/data/a.txt - /data/sub/a.txt]\n\
             \nSummary:\n\tduplicates=1\n\twasted space=1.50kb\n"
        );
    }

    #[test]
    fn test_text_report_marks_deletions() {
        let mut report = sample_report();
        report.deleted.push(PathBuf::from("/data/sub/a.txt"));
        assert!(render_text(&report).contains("Deleting /data/sub/a.txt\n"));

        report.dry_run = true;
        assert!(render_text(&report).contains("Would delete /data/sub/a.txt\n"));
    }

    #[test]
    fn test_empty_text_report() {
        let text = render_text(&DuplicateReport::default());

        assert_eq!(text, "\nSummary:\n\tduplicates=0\n\twasted space=0.00kb\n");
    }

    #[test]
    fn test_text_report_counts_unwalked_directories() {
        let mut report = sample_report();
        report.denied_dirs.push(PathBuf::from("/data/private"));
        report.unreadable_dirs.push(PathBuf::from("/data/stale-nfs"));
        report.unreadable_dirs.push(PathBuf::from("/data/broken"));

        let text = render_text(&report);

        assert!(text.ends_with(
            "\tskipped files=0\n\tdenied directories=1\n\tunreadable directories=2\n"
        ));
    }

    #[test]
    fn test_json_report_lists_unreadable_directories() {
        let mut report = sample_report();
        report.unreadable_dirs.push(PathBuf::from("/data/broken"));

        let json = render(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["unreadable_dirs"][0], "/data/broken");
        assert!(value.get("save_error").is_none());
    }

    #[test]
    fn test_csv_report() {
        let mut report = sample_report();
        report.deleted.push(PathBuf::from("/data/sub/a.txt"));

        let csv = render(&report, ReportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "index,md5,size,original,duplicate,deleted");
        assert_eq!(
            lines[1],
            "1,5d41402abc4b2a76b9719d911017c592,1536,/data/a.txt,/data/sub/a.txt,true"
        );
    }

    #[test]
    fn test_json_report() {
        let json = render(&sample_report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["wasted_space"], 1536);
        assert_eq!(value["duplicates"][0]["duplicate"], "/data/sub/a.txt");
        assert_eq!(value["duplicates"][0]["metadata"]["created"], serde_json::Value::Null);
    }
}
