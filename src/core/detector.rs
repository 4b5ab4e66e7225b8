use crate::domain::model::{Duplicate, DuplicateGroup, FileRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub duplicates: Vec<Duplicate>,
    pub groups: Vec<DuplicateGroup>,
    pub wasted_space: u64,
}

/// Sorts records by `(md5, path)` and pairs every later member of an equal
/// digest run with the first one, which is the file that stays.
pub fn find_duplicates(mut records: Vec<FileRecord>) -> Detection {
    records.sort_by(|a, b| a.md5.cmp(&b.md5).then_with(|| a.path.cmp(&b.path)));

    let mut detection = Detection::default();
    let mut group_start = 0;

    for i in 1..=records.len() {
        let run_ended = i == records.len() || records[i].md5 != records[group_start].md5;
        if !run_ended {
            continue;
        }

        let run = &records[group_start..i];
        if run.len() > 1 {
            let kept = &run[0];
            for item in &run[1..] {
                detection.wasted_space += item.metadata.size;
                detection.duplicates.push(Duplicate {
                    index: detection.duplicates.len() + 1,
                    md5: item.md5.clone(),
                    original: kept.path.clone(),
                    duplicate: item.path.clone(),
                    metadata: item.metadata.clone(),
                });
            }
            detection.groups.push(DuplicateGroup {
                md5: kept.md5.clone(),
                size: kept.metadata.size,
                files: run.iter().map(|r| r.path.clone()).collect(),
            });
        }
        group_start = i;
    }

    detection
}
