use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use thiserror::Error;

/// One scheduled workshop.  Only the date is used; any other fields in the
/// input are ignored.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(from = "RawRecord")]
pub(crate) struct WorkshopRecord {
    /// Expected to be `YYYY-MM-DD`, but not validated
    pub(crate) date: String,
}

/// A record as it appears in the input, before its date is checked
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    date: Value,
}

impl From<RawRecord> for WorkshopRecord {
    // A date that is not a string keeps its JSON text, and a missing one is
    // empty, so that neither ever matches a day of the calendar.
    fn from(raw: RawRecord) -> WorkshopRecord {
        let date = match raw.date {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        WorkshopRecord { date }
    }
}

impl WorkshopRecord {
    #[cfg(test)]
    pub(crate) fn new(date: &str) -> WorkshopRecord {
        WorkshopRecord {
            date: date.to_owned(),
        }
    }
}

/// Number of workshops per date string
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventCountIndex(BTreeMap<String, u32>);

impl EventCountIndex {
    pub(crate) fn from_records(records: &[WorkshopRecord]) -> EventCountIndex {
        let mut counts = BTreeMap::new();
        for r in records {
            let n: &mut u32 = counts.entry(r.date.clone()).or_default();
            *n = n.saturating_add(1);
        }
        EventCountIndex(counts)
    }

    pub(crate) fn get(&self, iso_date: &str) -> Option<u32> {
        self.0.get(iso_date).copied()
    }

    /// Number of distinct dates
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of workshops on dates beginning with `prefix` (e.g., a
    /// year such as `"2015-"`)
    pub(crate) fn total_with_prefix(&self, prefix: &str) -> u64 {
        self.0
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(_, &n)| u64::from(n))
            .sum()
    }
}

#[derive(Debug, Error)]
pub(crate) enum RecordsError {
    #[error("failed to read workshop records")]
    Read(#[from] std::io::Error),
    #[error("workshop records are not a JSON array of objects")]
    Parse(#[from] serde_json::Error),
}

/// Reads a JSON array of workshop records
pub(crate) fn load_records<R: Read>(mut reader: R) -> Result<Vec<WorkshopRecord>, RecordsError> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_date() {
        let index = EventCountIndex::from_records(&[
            WorkshopRecord::new("2015-06-01"),
            WorkshopRecord::new("2015-06-02"),
            WorkshopRecord::new("2015-06-01"),
            WorkshopRecord::new("2015-06-01"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("2015-06-01"), Some(3));
        assert_eq!(index.get("2015-06-02"), Some(1));
        assert_eq!(index.get("2015-06-03"), None);
    }

    #[test]
    fn test_malformed_dates_are_kept_but_never_match() {
        let index = EventCountIndex::from_records(&[
            WorkshopRecord::new("June 1st"),
            WorkshopRecord::new("2015-6-1"),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("2015-06-01"), None);
    }

    #[test]
    fn test_total_with_prefix() {
        let index = EventCountIndex::from_records(&[
            WorkshopRecord::new("2014-12-31"),
            WorkshopRecord::new("2015-01-01"),
            WorkshopRecord::new("2015-07-04"),
            WorkshopRecord::new("2015-07-04"),
            WorkshopRecord::new("2016-01-01"),
        ]);
        assert_eq!(index.total_with_prefix("2015-"), 3);
        assert_eq!(index.total_with_prefix("2017-"), 0);
    }

    #[test]
    fn test_load_records() {
        let json = r#"[
            {"date": "2015-02-14", "title": "Python 101", "expected_participants": 30},
            {"date": "2015-02-14", "title": "Git basics"},
            {"date": "2015-03-01"}
        ]"#;
        let records = load_records(json.as_bytes()).unwrap();
        assert_eq!(
            records,
            [
                WorkshopRecord::new("2015-02-14"),
                WorkshopRecord::new("2015-02-14"),
                WorkshopRecord::new("2015-03-01"),
            ]
        );
    }

    #[test]
    fn test_load_records_with_bad_dates() {
        let json = r#"[
            {"date": null},
            {"date": 20150101},
            {"title": "No date"},
            {"date": "2015-01-01"}
        ]"#;
        let records = load_records(json.as_bytes()).unwrap();
        assert_eq!(
            records,
            [
                WorkshopRecord::new(""),
                WorkshopRecord::new("20150101"),
                WorkshopRecord::new(""),
                WorkshopRecord::new("2015-01-01"),
            ]
        );
        let index = EventCountIndex::from_records(&records);
        assert_eq!(index.get("2015-01-01"), Some(1));
        assert_eq!(index.total_with_prefix("2015-"), 1);
    }

    #[test]
    fn test_load_records_not_an_array() {
        let r = load_records(r#"{"date": "2015-01-01"}"#.as_bytes());
        assert!(matches!(r, Err(RecordsError::Parse(_))));
    }

    #[test]
    fn test_load_empty() {
        assert!(load_records("[]".as_bytes()).unwrap().is_empty());
    }
}
