//! Category CLI commands

use clap::Subcommand;

use crate::backend::Backend;
use crate::display::category::format_category_list;
use crate::error::FintrackResult;
use crate::models::CategoryType;
use crate::services::CategoryService;
use crate::storage::Storage;
use crate::validation::ValidationErrors;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories (defaults and your own)
    List {
        /// Only this type (income, expense)
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },
    /// Create a category
    Create {
        /// Category name
        name: String,
        /// Category type (income, expense)
        #[arg(short = 't', long = "type", default_value = "expense")]
        category_type: String,
        /// Display color (e.g., "#4caf50")
        #[arg(short, long)]
        color: Option<String>,
    },
}

fn parse_type(value: &str) -> Result<CategoryType, ValidationErrors> {
    CategoryType::parse(value).ok_or_else(|| {
        ValidationErrors::single(
            "type",
            format!("Invalid category type: '{}'. Use income or expense.", value),
        )
    })
}

/// Handle a category command
pub async fn handle_category_command<B: Backend>(
    storage: &Storage<B>,
    cmd: CategoryCommands,
) -> FintrackResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { category_type } => {
            let category_type = category_type.as_deref().map(parse_type).transpose()?;
            let categories = service.list(category_type).await?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Create {
            name,
            category_type,
            color,
        } => {
            let category_type = parse_type(&category_type)?;
            let category = service.create(&name, category_type, color).await?;
            println!(
                "Created {} category: {}",
                category.category_type.as_str(),
                category.name
            );
            println!("  ID: {}", category.id);
        }
    }

    Ok(())
}
