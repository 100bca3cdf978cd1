use std::fmt::Write as _;

use assistant_core::view::{ListPanel, RecipePanel, ViewBody, ViewModel};

pub fn render_view(view: &ViewModel) -> String {
    let mut out = String::new();
    match &view.body {
        ViewBody::List(panel) => render_list(&mut out, panel),
        ViewBody::Recipe(panel) => render_recipe(&mut out, panel),
    }

    let filters: Vec<String> = view
        .filter_buttons
        .iter()
        .map(|button| {
            if button.active {
                format!("[{}]", button.label)
            } else {
                button.label.clone()
            }
        })
        .collect();
    let _ = writeln!(out, "Filters: {}", filters.join(" "));
    let _ = writeln!(out, "Status: {}", view.status_line);
    let _ = writeln!(out, "Log: {}", view.narration_log);
    let trigger = if view.assistant_enabled {
        "ready (type a phrase)"
    } else {
        "unavailable"
    };
    let _ = write!(out, "Assistant: {trigger}");
    out
}

fn render_list(out: &mut String, panel: &ListPanel) {
    let _ = writeln!(out, "== Recipes ==");
    if let Some(notice) = panel.notice {
        let _ = writeln!(out, "  {}", notice.message());
    }
    for card in &panel.cards {
        let _ = writeln!(
            out,
            "  #{} {} | {} | {} | prep {} | cook {}",
            card.id, card.name, card.cuisine, card.category, card.prep_time, card.cook_time
        );
    }
}

fn render_recipe(out: &mut String, panel: &RecipePanel) {
    let _ = writeln!(out, "== {} (#{}) ==", panel.title, panel.id);
    let _ = writeln!(
        out,
        "Cuisine: {} | Category: {} | Prep: {} | Cook: {} | Servings: {}",
        panel.cuisine, panel.category, panel.prep_time, panel.cook_time, panel.servings
    );
    let _ = writeln!(out, "Image: {}", panel.image_url);
    let _ = writeln!(out, "Ingredients:");
    for line in &panel.ingredients {
        let _ = writeln!(out, "  - {line}");
    }
    let _ = writeln!(out, "Steps:");
    if let Some(notice) = panel.steps_notice {
        let _ = writeln!(out, "  {notice}");
    }
    for step in &panel.steps {
        let marker = if step.current { '>' } else { ' ' };
        let _ = writeln!(out, "  {marker} {}. {}", step.index + 1, step.text);
    }
}
