use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};

/// Expense classification; every new expense starts as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Entertainment,
    Health,
    Shopping,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Housing,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Health,
        ExpenseCategory::Shopping,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Housing => "HOUSING",
            ExpenseCategory::Entertainment => "ENTERTAINMENT",
            ExpenseCategory::Health => "HEALTH",
            ExpenseCategory::Shopping => "SHOPPING",
            ExpenseCategory::Other => "OTHER",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "🍔 Food",
            ExpenseCategory::Transport => "🚌 Transport",
            ExpenseCategory::Housing => "🏠 Housing",
            ExpenseCategory::Entertainment => "🎬 Entertainment",
            ExpenseCategory::Health => "💊 Health",
            ExpenseCategory::Shopping => "🛍 Shopping",
            ExpenseCategory::Other => "📦 Other",
        }
    }
}

impl Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category `{}`", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
}

/// Daily spending cap and what has been spent on `day`
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub daily_cap: f64,
    pub daily_spent: f64,
    pub day: NaiveDate,
}

impl Limit {
    /// The limit as seen on `today`: spending of an earlier day does not count
    pub fn on(self, today: NaiveDate) -> Limit {
        if self.day == today {
            self
        } else {
            Limit {
                daily_cap: self.daily_cap,
                daily_spent: 0.0,
                day: today,
            }
        }
    }

    pub fn is_exceeded(&self) -> bool {
        self.daily_spent > self.daily_cap
    }
}

/// Conversion of a stored item to and from one row of spreadsheet cells
pub trait SheetRow: Sized {
    fn to_row(&self) -> Vec<String>;

    fn from_row(row: &[String]) -> Result<Self, String>;
}

fn cell<'a>(row: &'a [String], idx: usize, name: &str) -> Result<&'a str, String> {
    row.get(idx)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("missing {} column", name))
}

fn parse_amount(row: &[String], idx: usize, name: &str) -> Result<f64, String> {
    let raw = cell(row, idx, name)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{} `{}` is not a number", name, raw))
}

fn parse_timestamp(row: &[String], idx: usize) -> Result<DateTime<Utc>, String> {
    let raw = cell(row, idx, "timestamp")?;
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("timestamp `{}`: {}", raw, e))
}

impl SheetRow for Income {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339(),
            self.description.clone(),
            self.amount.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Income {
            timestamp: parse_timestamp(row, 0)?,
            description: cell(row, 1, "description")?.to_string(),
            amount: parse_amount(row, 2, "amount")?,
        })
    }
}

impl SheetRow for Expense {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339(),
            self.description.clone(),
            self.amount.to_string(),
            self.category.to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        Ok(Expense {
            timestamp: parse_timestamp(row, 0)?,
            description: cell(row, 1, "description")?.to_string(),
            amount: parse_amount(row, 2, "amount")?,
            category: cell(row, 3, "category")?.parse()?,
        })
    }
}

/// Balance is stored as a single one-cell row
impl SheetRow for f64 {
    fn to_row(&self) -> Vec<String> {
        vec![self.to_string()]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        parse_amount(row, 0, "balance")
    }
}

impl SheetRow for Limit {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.daily_cap.to_string(),
            self.daily_spent.to_string(),
            self.day.format("%Y-%m-%d").to_string(),
        ]
    }

    fn from_row(row: &[String]) -> Result<Self, String> {
        let day = cell(row, 2, "day")?;
        Ok(Limit {
            daily_cap: parse_amount(row, 0, "daily cap")?,
            daily_spent: parse_amount(row, 1, "daily spent")?,
            day: NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
                .map_err(|e| format!("day `{}`: {}", day, e))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("food".parse::<ExpenseCategory>(), Ok(ExpenseCategory::Food));
        assert_eq!(
            "OTHER".parse::<ExpenseCategory>(),
            Ok(ExpenseCategory::Other)
        );
        assert!("SALARY".parse::<ExpenseCategory>().is_err());
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Other);
    }

    #[test]
    fn test_expense_row() {
        let expense = Expense {
            timestamp: Utc.with_ymd_and_hms(2024, 10, 5, 12, 30, 0).unwrap(),
            description: "Coffee beans".to_string(),
            amount: 5.5,
            category: ExpenseCategory::Food,
        };
        let cells = expense.to_row();
        assert_eq!(cells[1], "Coffee beans");
        assert_eq!(cells[2], "5.5");
        assert_eq!(cells[3], "FOOD");
        assert_eq!(Expense::from_row(&cells), Ok(expense));
    }

    #[test]
    fn test_malformed_rows() {
        assert!(Income::from_row(&row(&["not a date", "salary", "500"])).is_err());
        assert!(Income::from_row(&row(&["2024-10-05T00:00:00+00:00", "salary"])).is_err());
        assert!(
            Expense::from_row(&row(&["2024-10-05T00:00:00+00:00", "x", "1", "CARS"])).is_err()
        );
        assert!(f64::from_row(&row(&["lots"])).is_err());
        assert!(Limit::from_row(&row(&["100", "5", "yesterday"])).is_err());
    }

    #[test]
    fn test_limit_rolls_over_to_new_day() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 5).unwrap();
        let limit = Limit {
            daily_cap: 100.0,
            daily_spent: 120.0,
            day,
        };
        assert!(limit.is_exceeded());
        assert_eq!(limit.clone().on(day), limit);

        let next = limit.on(day.succ_opt().unwrap());
        assert_eq!(next.daily_spent, 0.0);
        assert_eq!(next.daily_cap, 100.0);
        assert!(!next.is_exceeded());
    }

    #[test]
    fn test_limit_row() {
        let cells = row(&["100", "90.5", "2024-10-05"]);
        let limit = Limit::from_row(&cells).unwrap();
        assert_eq!(limit.daily_spent, 90.5);
        assert_eq!(limit.to_row(), cells);
    }
}
