//! Categories command handler

use clusterprobe::Category;

/// Render every category with its label and accepted aliases
#[must_use]
pub fn render_categories() -> String {
    let width = Category::ALL
        .iter()
        .map(|c| c.key().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for category in Category::ALL {
        out.push_str(&format!("{:<width$}  {}\n", category.key(), category.label()));
        let aliases = category.aliases();
        if !aliases.is_empty() {
            out.push_str(&format!("{:<width$}  aliases: {}\n", "", aliases.join(", ")));
        }
    }
    out
}

/// Execute the categories command
pub fn execute_categories() {
    print!("{}", render_categories());
}
