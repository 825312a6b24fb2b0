//! `calendar category ...`

use super::{resolve_category, save_after};
use crate::output::{self, render, OutputMode};
use crate::Calendar;
use anyhow::anyhow;
use calendar_core::{Category, CategoryDraft};
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Args, Debug)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories by name.
    List,
    /// Add a category.
    Add {
        name: String,
        /// Display color as `#RRGGBB`.
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Change a category's name or color.
    Update {
        /// Category id, key or name.
        category: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category. Its events become uncategorized.
    Delete {
        /// Category id, key or name.
        category: String,
    },
}

pub fn run(calendar: &mut Calendar, args: CategoryArgs, output: OutputMode) -> anyhow::Result<()> {
    match args.command {
        CategoryCommand::List => {
            calendar.sort_categories();
            render(output, calendar.categories(), |categories, w| {
                output::section(w, "Categories")?;
                for category in categories {
                    output::category_line(w, category)?;
                }
                Ok(())
            })
        }
        CategoryCommand::Add { name, color } => {
            let result = calendar.add_category(CategoryDraft::new(name, color));
            let key = save_after(calendar, result)?;
            print_category(calendar, key, output, "Added")
        }
        CategoryCommand::Update {
            category,
            name,
            color,
        } => {
            let key = resolve_category(calendar, &category)?;
            let current = calendar
                .category(key)
                .ok_or_else(|| anyhow!("category not found: {category}"))?;
            let draft = CategoryDraft::new(
                name.unwrap_or_else(|| current.name.clone()),
                color.unwrap_or_else(|| current.color_hex.clone()),
            );
            let result = calendar.update_category(key, draft);
            save_after(calendar, result)?;
            print_category(calendar, key, output, "Updated")
        }
        CategoryCommand::Delete { category } => {
            let key = resolve_category(calendar, &category)?;
            let result = calendar.delete_category(key);
            save_after(calendar, result)?;
            render(output, &serde_json::json!({ "ok": true, "deleted": key }), |_, w| {
                writeln!(w, "Deleted category {key}")
            })
        }
    }
}

fn print_category(
    calendar: &Calendar,
    key: calendar_core::RecordKey,
    output: OutputMode,
    verb: &str,
) -> anyhow::Result<()> {
    let category: &Category = calendar
        .category(key)
        .ok_or_else(|| anyhow!("category not found: {key}"))?;
    render(output, category, |category, w| {
        write!(w, "{verb}: ")?;
        output::category_line(w, category)
    })
}
