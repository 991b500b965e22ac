use yoroolbot::reply::{Button, ButtonGrid};

use crate::storages::{ExpenseCategory, StorageMode};

const STORAGE_PREFIX: &str = "storage:";
const CATEGORY_PREFIX: &str = "category:";

pub fn storage_choice_menu() -> ButtonGrid {
    ButtonGrid::new().row([
        Button::new("🤖 Keep in bot", storage_data(StorageMode::Local)),
        Button::new("📄 Google spreadsheet", storage_data(StorageMode::Remote)),
    ])
}

pub fn storage_data(mode: StorageMode) -> String {
    format!("{}{}", STORAGE_PREFIX, mode)
}

/// Storage mode selected by a storage menu button
pub fn parse_storage_data(data: &str) -> Option<StorageMode> {
    data.strip_prefix(STORAGE_PREFIX)?.parse().ok()
}

pub fn category_menu() -> ButtonGrid {
    ButtonGrid::columns(
        ExpenseCategory::ALL
            .iter()
            .map(|c| Button::new(c.label(), category_data(*c))),
        2,
    )
}

pub fn category_data(category: ExpenseCategory) -> String {
    format!("{}{}", CATEGORY_PREFIX, category)
}

/// Category selected by a category menu button
pub fn parse_category_data(data: &str) -> Option<ExpenseCategory> {
    data.strip_prefix(CATEGORY_PREFIX)?.parse().ok()
}
