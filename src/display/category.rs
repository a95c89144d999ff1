//! Category display formatting

use crate::models::{Category, CategoryType};

/// Format categories grouped by type, income first
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let mut output = String::new();
    for category_type in [CategoryType::Income, CategoryType::Expense] {
        let group: Vec<&Category> = categories
            .iter()
            .filter(|c| c.category_type == category_type)
            .collect();
        if group.is_empty() {
            continue;
        }

        output.push_str(&format!("{}:\n", category_type));
        for category in group {
            let marker = if category.is_default() { " (default)" } else { "" };
            output.push_str(&format!(
                "  {:<24} {:<9} {}{}\n",
                category.name,
                category.color.as_deref().unwrap_or(""),
                category.id,
                marker
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::category;

    #[test]
    fn test_grouped_by_type() {
        let mut salary = category("Salary");
        salary.category_type = CategoryType::Income;
        let mut rent = category("Rent");
        rent.is_default = Some(true);

        let text = format_category_list(&[rent, salary]);
        let income_at = text.find("Income:").unwrap();
        let expense_at = text.find("Expense:").unwrap();
        assert!(income_at < expense_at);
        assert!(text.contains("(default)"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_category_list(&[]), "No categories found.\n");
    }
}
