use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A tick label: either an integer or a string. This is the default
/// label type, for axes whose labels are not known statically to be
/// of one kind.
///
/// Integer labels order before string labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Int(i64),
    Str(String),
}

impl Label {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(i) => Some(*i),
            Label::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Label::Int(_) => None,
            Label::Str(s) => Some(s),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(i) => write!(f, "{}", i),
            Label::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<i32> for Label {
    fn from(i: i32) -> Self {
        Label::Int(i.into())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Str(s)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(Label::from("a"), Label::Str("a".to_string()));
        assert_eq!(Label::from(3i64), Label::Int(3));
        assert_eq!(Label::from(3i64).as_int(), Some(3));
        assert_eq!(Label::from("x").as_str(), Some("x"));
        assert!(Label::from(100i64) < Label::from("a"));
        assert_eq!(Label::from("ab").to_string(), "ab");
    }

    #[test]
    fn test_label_serde_untagged() {
        let labels = vec![Label::from(1i64), Label::from("b")];
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"[1,"b"]"#);
        assert_eq!(serde_json::from_str::<Vec<Label>>(&json).unwrap(), labels);
    }
}
