//! Plain text rendering of the catalog and detail views.
//!
//! Shared by the terminal front end and the MCP tools, so everything here
//! returns a `String` instead of printing.

use crate::catalog::{CatalogPhase, CatalogState, TypeFilter};
use crate::detail::{DetailPage, DetailPhase, DetailState};
use crate::diagnostics::DiagnosticLog;
use crate::entry::{capitalize, Entry, EntryId};
use crate::evolution::EvolutionStage;
use crate::species::NO_DESCRIPTION;
use schema::PokemonType;

const STAT_BAR_WIDTH: u32 = 20;
const MAX_BASE_STAT: u32 = 255;
const CARD_ABILITIES: usize = 2;

fn type_labels(types: &[PokemonType]) -> String {
    types
        .iter()
        .map(|t| t.label())
        .collect::<Vec<_>>()
        .join("/")
}

fn ability_label(name: &str) -> String {
    name.replace('-', " ")
}

/// One catalog card: number, name, types, size and the first abilities.
pub fn format_card(entry: &Entry) -> String {
    let base_experience = entry
        .base_experience
        .map(|exp| exp.to_string())
        .unwrap_or_else(|| "-".to_string());
    let abilities = entry
        .abilities
        .iter()
        .take(CARD_ABILITIES)
        .map(|ability| capitalize(&ability.name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut output = format!(
        "{} {} [{}]\n",
        entry.id.dex_number(),
        entry.display_name(),
        type_labels(&entry.types)
    );
    output.push_str(&format!(
        "     Height: {} m | Weight: {} kg | Base exp: {}\n",
        entry.height_m(),
        entry.weight_kg(),
        base_experience
    ));
    if !abilities.is_empty() {
        output.push_str(&format!("     Abilities: {}\n", abilities));
    }
    output
}

/// Title line over the visible cards.
pub fn catalog_headline(kind: TypeFilter, search: &str, count: usize) -> String {
    match kind {
        _ if !search.is_empty() => {
            let scope = match kind {
                TypeFilter::All => String::new(),
                TypeFilter::Only(t) => format!(" (type {})", t),
            };
            format!("Results for \"{}\"{} ({})", search, scope, count)
        }
        TypeFilter::All => format!("All Pokémon ({})", count),
        TypeFilter::Only(t) => format!("{} type Pokémon ({})", t.label(), count),
    }
}

/// Message and hint shown when nothing passes the filter.
pub fn empty_catalog_message(kind: TypeFilter, search: &str) -> String {
    if !search.is_empty() {
        format!(
            "No Pokémon match \"{}\".\nTry another search term or clear the search.\n",
            search
        )
    } else {
        match kind {
            TypeFilter::All => "No Pokémon loaded.\n".to_string(),
            TypeFilter::Only(t) => format!(
                "No Pokémon of type {} found.\nTry another type or show all types.\n",
                t
            ),
        }
    }
}

fn format_diagnostics(diagnostics: &DiagnosticLog) -> String {
    if diagnostics.is_empty() {
        return String::new();
    }
    format!("\n--- Problems ({}) ---\n{}", diagnostics.len(), diagnostics)
}

pub fn format_catalog(state: &CatalogState) -> String {
    match state.phase() {
        CatalogPhase::Idle => return "Catalog not loaded.\n".to_string(),
        CatalogPhase::Loading => return "Loading catalog...\n".to_string(),
        CatalogPhase::Ready => {}
    }

    let filter = state.filter();
    let visible = state.visible();
    let mut output = format!(
        "{}\n\n",
        catalog_headline(filter.kind(), filter.search(), visible.len())
    );

    if visible.is_empty() {
        output.push_str(&empty_catalog_message(filter.kind(), filter.search()));
    } else {
        for entry in visible {
            output.push_str(&format_card(entry));
        }
    }

    output.push_str(&format_diagnostics(state.diagnostics()));
    output
}

fn stat_bar(value: u32) -> String {
    let filled = (value.min(MAX_BASE_STAT) * STAT_BAR_WIDTH / MAX_BASE_STAT) as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(STAT_BAR_WIDTH as usize - filled)
    )
}

fn format_evolution(stages: &[EvolutionStage], current: EntryId, hidden_branches: usize) -> String {
    let mut output = String::from("\n--- Evolution ---\n");
    for (i, stage) in stages.iter().enumerate() {
        let marker = if stage.id == current { " <- current" } else { "" };
        output.push_str(&format!(
            " {}. {} {} [{}]{}\n",
            i + 1,
            stage.id.dex_number(),
            capitalize(&stage.name),
            type_labels(&stage.types),
            marker
        ));
    }
    if hidden_branches > 0 {
        output.push_str(&format!(
            "  (+{} other branch{} not shown)\n",
            hidden_branches,
            if hidden_branches == 1 { "" } else { "es" }
        ));
    }
    output
}

pub fn format_page(page: &DetailPage, shiny: bool) -> String {
    let entry = &page.entry;
    let badges = entry
        .types
        .iter()
        .map(|t| t.as_ref().to_uppercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut output = format!(
        "--- {} {} ---\n",
        entry.display_name(),
        entry.id.dex_number()
    );
    output.push_str(&format!("Types: {}\n", badges));
    if let Some(image) = entry.images.portrait(shiny) {
        let label = if shiny { "Image (shiny)" } else { "Image" };
        output.push_str(&format!("{}: {}\n", label, image));
    }
    output.push_str(&format!(
        "{}\n",
        page.description.as_deref().unwrap_or(NO_DESCRIPTION)
    ));

    output.push_str("\n--- Base Stats ---\n");
    output.push_str(&format!(
        "Height: {} m | Weight: {} kg\n",
        entry.height_m(),
        entry.weight_kg()
    ));
    for stat in &entry.stats {
        output.push_str(&format!(
            "{:<16}{:>4} {}\n",
            ability_label(&stat.name).to_uppercase(),
            stat.value,
            stat_bar(stat.value)
        ));
    }

    if !entry.abilities.is_empty() {
        output.push_str("\n--- Abilities ---\n");
        for ability in &entry.abilities {
            let hidden = if ability.hidden { " (hidden)" } else { "" };
            output.push_str(&format!("  {}{}\n", ability_label(&ability.name), hidden));
        }
    }

    if page.evolution.len() > 1 {
        output.push_str(&format_evolution(
            &page.evolution,
            entry.id,
            page.hidden_branches,
        ));
    }
    output
}

pub fn not_found_message(id: Option<EntryId>) -> String {
    let subject = match id {
        Some(id) => format!("Pokémon {}", id.dex_number()),
        None => "That Pokémon".to_string(),
    };
    format!(
        "{} was not found.\nRun `pokedex list` to browse the catalog.\n",
        subject
    )
}

pub fn format_detail(state: &DetailState) -> String {
    let body = match state.phase() {
        DetailPhase::Idle => "No Pokémon selected.\n".to_string(),
        DetailPhase::Loading => "Loading...\n".to_string(),
        DetailPhase::NotFound => not_found_message(state.id()),
        DetailPhase::Ready(page) => format_page(page, state.show_shiny()),
    };
    format!("{}{}", body, format_diagnostics(state.diagnostics()))
}
