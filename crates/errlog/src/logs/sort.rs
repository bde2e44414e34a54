//! Multi-key ordering of aggregated entries.
//!
//! Fields are addressed by their serialized name, with dots for nested
//! values (`location.line`), and compared as natural case-insensitive
//! strings so that `"2" < "10"`. The sort is stable.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// One `(field path, direction)` comparison, written `field[:asc|desc]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Most recently seen first.
    pub fn default_order() -> Vec<SortKey> {
        vec![SortKey::desc("last")]
    }

    /// Parse a comma-separated list: `hits:desc,type`.
    pub fn parse_list(list: &str) -> Result<Vec<SortKey>, ViewerError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<SortKey>())
            .collect()
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.field.split('.')
    }
}

impl FromStr for SortKey {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => {
                        return Err(ViewerError::InvalidSortKey(format!(
                            "unknown direction '{}' in '{}'",
                            other, s
                        )))
                    }
                };
                (field.trim(), direction)
            }
            None => (s.trim(), SortDirection::Asc),
        };

        if field.is_empty() || field.split('.').any(str::is_empty) {
            return Err(ViewerError::InvalidSortKey(format!("empty field path in '{}'", s)));
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

impl TryFrom<String> for SortKey {
    type Error = ViewerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Stable sort of any serializable records by `keys`.
///
/// Each record is projected once; ties on every key keep insertion order.
pub fn sort_records<T: Serialize>(records: Vec<T>, keys: &[SortKey]) -> Vec<T> {
    if keys.is_empty() {
        return records;
    }

    let mut keyed: Vec<(Vec<String>, T)> = records
        .into_iter()
        .map(|record| (project_keys(&record, keys), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_projected(a, b, keys));
    keyed.into_iter().map(|(_, record)| record).collect()
}

fn project_keys<T: Serialize>(record: &T, keys: &[SortKey]) -> Vec<String> {
    let value = serde_json::to_value(record).unwrap_or(Value::Null);
    keys.iter().map(|key| project(&value, key)).collect()
}

fn compare_projected(a: &[String], b: &[String], keys: &[SortKey]) -> Ordering {
    for ((left, right), key) in a.iter().zip(b).zip(keys) {
        let ord = natural_cmp(left, right);
        if ord != Ordering::Equal {
            return match key.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
        }
    }
    Ordering::Equal
}

/// Walk a dotted path; missing fields project to the empty string.
fn project(value: &Value, key: &SortKey) -> String {
    let mut node = value;
    for segment in key.segments() {
        let next = match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(v) => node = v,
            None => return String::new(),
        }
    }

    match node {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        other => other.to_string(),
    }
}

/// Natural, case-insensitive comparison: digit runs compare by numeric
/// value, everything else character by character ignoring ASCII case.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    loop {
        while i < a.len() && a[i].is_whitespace() {
            i += 1;
        }
        while j < b.len() && b[j].is_whitespace() {
            j += 1;
        }

        match (a.get(i), b.get(j)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let start_a = i;
                while i < a.len() && a[i].is_ascii_digit() {
                    i += 1;
                }
                let start_b = j;
                while j < b.len() && b[j].is_ascii_digit() {
                    j += 1;
                }
                let ord = compare_digit_runs(&a[start_a..i], &b[start_b..j]);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let ord = ca.to_ascii_lowercase().cmp(&cb.to_ascii_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                i += 1;
                j += 1;
            }
        }
    }
}

fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(run: &[char]) -> &[char] {
    let zeros = run.iter().take_while(|c| **c == '0').count();
    &run[zeros..]
}
