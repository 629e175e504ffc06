use anyhow::Result;
use inquire::MultiSelect;

/// Prompts the user to pick which projects to show; all are preselected
pub fn prompt_select_projects(names: &[&str]) -> Result<Vec<String>> {
    if names.is_empty() {
        anyhow::bail!("No projects to select from");
    }

    let options: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let defaults: Vec<usize> = (0..options.len()).collect();

    let selected = MultiSelect::new("Projects to show:", options)
        .with_default(&defaults)
        .prompt()?;

    Ok(selected)
}
