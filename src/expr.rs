use std::collections::HashSet;

use chrono::NaiveDate;

/// A set of optional strings used for set-membership filtering.
///
/// Null is an ordinary member: a set built from `[Some("a"), None]` matches
/// null entries, while one built from `["a"]` never does.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringSet {
    values: HashSet<String>,
    includes_null: bool,
}

impl StringSet {
    /// Whether `value` (or null, for `None`) is a member of the set.
    pub fn contains(&self, value: Option<&str>) -> bool {
        match value {
            Some(value) => self.values.contains(value),
            None => self.includes_null,
        }
    }

    pub fn includes_null(&self) -> bool {
        self.includes_null
    }

    /// Number of distinct members, counting null as one.
    pub fn len(&self) -> usize {
        self.values.len() + usize::from(self.includes_null)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-null members in sorted order.
    pub fn sorted_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.values.iter().map(String::as_str).collect();
        values.sort_unstable();
        values
    }

    fn insert(&mut self, value: Option<String>) {
        match value {
            Some(value) => {
                self.values.insert(value);
            }
            None => self.includes_null = true,
        }
    }
}

impl<'a> FromIterator<&'a str> for StringSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Some).collect()
    }
}

impl FromIterator<String> for StringSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        iter.into_iter().map(Some).collect()
    }
}

impl<'a> FromIterator<Option<&'a str>> for StringSet {
    fn from_iter<I: IntoIterator<Item = Option<&'a str>>>(iter: I) -> Self {
        iter.into_iter().map(|v| v.map(str::to_owned)).collect()
    }
}

impl FromIterator<Option<String>> for StringSet {
    fn from_iter<I: IntoIterator<Item = Option<String>>>(iter: I) -> Self {
        let mut set = StringSet::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Predicate tree evaluated at partition, row-group and row level.
///
/// Leaves constrain a single column. Composite nodes combine two children
/// with AND or OR. Predicates are immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `column == value` on an integer column of any width or signedness.
    Equality { column: String, value: i64 },
    /// `start <= column <= end` on an integer column.
    Range {
        column: String,
        start: i64,
        end: i64,
    },
    /// Membership of a string column in a set of optional strings.
    InSet { column: String, values: StringSet },
    /// `start <= column <= end` on a `Date32` or `Date64` column.
    DateRange {
        column: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Build an integer equality predicate.
    pub fn eq(column: impl Into<String>, value: i64) -> Self {
        Predicate::Equality {
            column: column.into(),
            value,
        }
    }

    /// Build an inclusive integer range predicate.
    pub fn range(column: impl Into<String>, start: i64, end: i64) -> Self {
        Predicate::Range {
            column: column.into(),
            start,
            end,
        }
    }

    /// Build a string set-membership predicate.
    pub fn in_set(column: impl Into<String>, values: StringSet) -> Self {
        Predicate::InSet {
            column: column.into(),
            values,
        }
    }

    /// Build an inclusive date range predicate.
    pub fn date_range(column: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Predicate::DateRange {
            column: column.into(),
            start,
            end,
        }
    }

    /// Combine with `other` so both must hold.
    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    /// Combine with `other` so either may hold.
    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// The column constrained by a leaf, `None` for composite nodes.
    pub fn column(&self) -> Option<&str> {
        match self {
            Predicate::Equality { column, .. }
            | Predicate::Range { column, .. }
            | Predicate::InSet { column, .. }
            | Predicate::DateRange { column, .. } => Some(column),
            Predicate::And(..) | Predicate::Or(..) => None,
        }
    }

    /// Every column referenced by the tree, in first-seen order, without repeats.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        self.collect_columns(&mut columns);
        columns
    }

    pub(crate) fn collect_columns<'a>(&'a self, columns: &mut Vec<&'a str>) {
        match self {
            Predicate::And(left, right) | Predicate::Or(left, right) => {
                left.collect_columns(columns);
                right.collect_columns(columns);
            }
            leaf => {
                if let Some(column) = leaf.column() {
                    if !columns.contains(&column) {
                        columns.push(column);
                    }
                }
            }
        }
    }
}

/// A predicate split into its composite shape or a single-column leaf.
pub(crate) enum Node<'a> {
    And(&'a Predicate, &'a Predicate),
    Or(&'a Predicate, &'a Predicate),
    Leaf(Leaf<'a>),
}

/// A constraint on one column.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Leaf<'a> {
    Equality {
        column: &'a str,
        value: i64,
    },
    Range {
        column: &'a str,
        start: i64,
        end: i64,
    },
    InSet {
        column: &'a str,
        values: &'a StringSet,
    },
    DateRange {
        column: &'a str,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl<'a> Leaf<'a> {
    pub(crate) fn column(&self) -> &'a str {
        match *self {
            Leaf::Equality { column, .. }
            | Leaf::Range { column, .. }
            | Leaf::InSet { column, .. }
            | Leaf::DateRange { column, .. } => column,
        }
    }
}

impl Predicate {
    pub(crate) fn node(&self) -> Node<'_> {
        match self {
            Predicate::And(left, right) => Node::And(left, right),
            Predicate::Or(left, right) => Node::Or(left, right),
            Predicate::Equality { column, value } => Node::Leaf(Leaf::Equality {
                column,
                value: *value,
            }),
            Predicate::Range { column, start, end } => Node::Leaf(Leaf::Range {
                column,
                start: *start,
                end: *end,
            }),
            Predicate::InSet { column, values } => Node::Leaf(Leaf::InSet { column, values }),
            Predicate::DateRange { column, start, end } => Node::Leaf(Leaf::DateRange {
                column,
                start: *start,
                end: *end,
            }),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Equality { column, value } => write!(f, "{column} = {value}"),
            Predicate::Range { column, start, end } => {
                write!(f, "{column} BETWEEN {start} AND {end}")
            }
            Predicate::InSet { column, values } => {
                write!(f, "{column} IN (")?;
                let mut first = true;
                for value in values.sorted_values() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value:?}")?;
                    first = false;
                }
                if values.includes_null() {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "NULL")?;
                }
                write!(f, ")")
            }
            Predicate::DateRange { column, start, end } => {
                write!(f, "{column} BETWEEN DATE '{start}' AND DATE '{end}'")
            }
            Predicate::And(left, right) => write!(f, "({left} AND {right})"),
            Predicate::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_set_null_membership() {
        let with_null: StringSet = [Some("abc"), None].into_iter().collect();
        assert!(with_null.contains(None));
        assert!(with_null.contains(Some("abc")));
        assert!(!with_null.contains(Some("def")));
        assert_eq!(with_null.len(), 2);

        let without_null: StringSet = ["abc"].into_iter().collect();
        assert!(!without_null.contains(None));
        assert_eq!(without_null.len(), 1);
    }

    #[test]
    fn columns_are_deduplicated_in_order() {
        let predicate = Predicate::eq("b", 1)
            .and(Predicate::range("a", 0, 3))
            .or(Predicate::eq("b", 2));
        assert_eq!(predicate.columns(), vec!["b", "a"]);
    }

    #[test]
    fn display_renders_tree() {
        let values: StringSet = [Some("y"), Some("x"), None].into_iter().collect();
        let predicate = Predicate::eq("id", 3)
            .and(Predicate::in_set("name", values))
            .or(Predicate::range("id", -1, 1));
        assert_eq!(
            predicate.to_string(),
            r#"((id = 3 AND name IN ("x", "y", NULL)) OR id BETWEEN -1 AND 1)"#
        );

        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            Predicate::date_range("date", start, end).to_string(),
            "date BETWEEN DATE '2024-02-01' AND DATE '2024-02-10'"
        );
    }
}
