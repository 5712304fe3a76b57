//! Interactive command selection.
//!
//! Used when the CLI is started without a subcommand.

use dialoguer::{Input, Select};

use crate::Commands;

/// Top-level actions offered by the menu.
enum Tool {
    Summary,
    Features,
    Predict,
    Serve,
}

impl Tool {
    const ALL: &[Self] = &[Self::Summary, Self::Features, Self::Predict, Self::Serve];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Summary => "Show area risk summary",
            Self::Features => "Show outbreak features for an area",
            Self::Predict => "Predict outbreak risk for an area",
            Self::Serve => "Start server",
        }
    }
}

fn prompt_area() -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt("Area")
        .default("Pimpri".to_string())
        .interact_text()
}

/// Asks the user what to run.
///
/// # Errors
///
/// Returns [`dialoguer::Error`] if the terminal cannot be read.
pub fn prompt() -> Result<Commands, dialoguer::Error> {
    println!("Civic Risk Toolkit");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match Tool::ALL[idx] {
        Tool::Summary => Commands::Summary,
        Tool::Features => Commands::Features {
            area: prompt_area()?,
        },
        Tool::Predict => Commands::Predict {
            area: prompt_area()?,
        },
        Tool::Serve => Commands::Serve,
    })
}
