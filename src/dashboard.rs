use std::{fmt::Write, sync::Arc};

use crate::controller::MapEvent;
use crate::feature::{BoundaryFeature, PlantFeature};

pub const NO_PLANTS_MESSAGE: &str = "No known energy plants in this ZCTA.";

/// A boundary together with the plants it contains.
#[derive(Debug, Clone)]
pub struct Selection {
    pub boundary: Arc<BoundaryFeature>,
    pub points: Vec<Arc<PlantFeature>>,
}

/// What the panel shows. Selection supersedes hover.
#[derive(Debug, Clone, Copy)]
pub enum DashboardView<'a> {
    Selected(&'a Selection),
    Hovered(&'a Selection),
    Empty,
}

/// Selection / hover state fed by map events.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    selected: Option<Selection>,
    hovered: Option<Selection>,
    notice: Option<String>,
    expanded: Option<usize>,
}

impl DashboardState {
    pub fn new() -> Self { Self::default() }

    pub fn apply(&mut self, event: &MapEvent) {
        match event {
            MapEvent::BoundaryClick { boundary, points } => {
                self.selected = Some(Selection { boundary: boundary.clone(), points: points.clone() });
                self.hovered = None;
                self.notice = None;
                self.expanded = None;
            }
            MapEvent::BoundaryHover { boundary, points } => {
                if self.selected.is_some() {
                    return;
                }
                self.hovered = boundary.as_ref()
                    .map(|boundary| Selection { boundary: boundary.clone(), points: points.clone() });
                self.expanded = None;
            }
            MapEvent::SearchFailed { code, .. } => {
                self.notice = Some(format!("ZIP code {code} not found."));
            }
            MapEvent::SelectionCleared => {
                self.selected = None;
                self.expanded = None;
            }
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a MapEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    #[inline] pub fn selected(&self) -> Option<&Selection> { self.selected.as_ref() }

    #[inline] pub fn hovered(&self) -> Option<&Selection> { self.hovered.as_ref() }

    #[inline] pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

    #[inline] pub fn expanded(&self) -> Option<usize> { self.expanded }

    pub fn view(&self) -> DashboardView<'_> {
        match (&self.selected, &self.hovered) {
            (Some(selected), _) => DashboardView::Selected(selected),
            (None, Some(hovered)) => DashboardView::Hovered(hovered),
            (None, None) => DashboardView::Empty,
        }
    }

    /// Expand a plant's details, or collapse it if already expanded.
    pub fn toggle_plant(&mut self, index: usize) {
        self.expanded = if self.expanded == Some(index) { None } else { Some(index) };
    }

    /// Plain-text rendering of the panel.
    pub fn render_text(&self) -> String {
        let mut out = String::from("Energy Dashboard\n");
        if let Some(notice) = &self.notice {
            let _ = writeln!(out, "{notice}");
        }

        let (heading, selection, hint) = match self.view() {
            DashboardView::Selected(s) => ("Selected ZCTA", s, "Click on other ZCTAs or hover for plant info."),
            DashboardView::Hovered(s) => ("Hovered ZCTA", s, "Click to select this ZCTA."),
            DashboardView::Empty => return out,
        };

        let _ = writeln!(out, "{heading}: {}", selection.boundary.display_code());
        let _ = writeln!(out, "Energy Plants:");
        if selection.points.is_empty() {
            let _ = writeln!(out, "  {NO_PLANTS_MESSAGE}");
        }
        for (i, plant) in selection.points.iter().enumerate() {
            let _ = writeln!(out, "  - {}", plant.name().unwrap_or("Unnamed Plant"));
            if self.expanded == Some(i) {
                for line in plant_details(plant) {
                    let _ = writeln!(out, "      {line}");
                }
            }
        }
        let _ = writeln!(out, "{hint}");
        out
    }
}

/// Detail lines of an expanded plant.
pub fn plant_details(plant: &PlantFeature) -> Vec<String> {
    fn text(value: &Option<String>) -> &str {
        value.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
    }
    fn number(value: Option<f64>) -> String {
        value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
    }

    let p = plant.properties();
    vec![
        format!("Utility: {}", text(&p.utility_name)),
        format!("City: {}", text(&p.city_name)),
        format!("Technology: {}", text(&p.tech_desc)),
        format!("Source: {}", text(&p.primary_source)),
        format!("Sector: {}", text(&p.sector_name)),
        format!("Installed MW: {}", number(p.installed_mw)),
        format!("Total MW: {}", number(p.total_mw)),
    ]
}

/// ZIP search input. Only checks for non-empty trimmed text; the map surface
/// extracts the actual code.
#[derive(Debug, Clone, Default)]
pub struct ZipForm {
    input: String,
}

impl ZipForm {
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    #[inline] pub fn input(&self) -> &str { &self.input }

    /// The submission to emit, if any.
    pub fn submit(&self) -> Option<String> {
        let trimmed = self.input.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{CodeKeys, PlantProperties};
    use serde_json::json;

    fn boundary(code: &str) -> Arc<BoundaryFeature> {
        let props = json!({ "ZCTA5CE10": code }).as_object().cloned().unwrap();
        Arc::new(BoundaryFeature::new(None, props, &CodeKeys::default()))
    }

    fn plant(name: &str) -> Arc<PlantFeature> {
        Arc::new(PlantFeature::at(0.0, 0.0, PlantProperties {
            name: Some(name.into()),
            primary_source: Some("Solar".into()),
            installed_mw: Some(2.5),
            ..Default::default()
        }))
    }

    #[test]
    fn selection_supersedes_hover() {
        let mut state = DashboardState::new();
        state.apply(&MapEvent::BoundaryHover { boundary: Some(boundary("53703")), points: vec![] });
        assert!(matches!(state.view(), DashboardView::Hovered(_)));

        state.apply(&MapEvent::BoundaryClick { boundary: boundary("53704"), points: vec![] });
        assert!(state.hovered().is_none(), "click clears hover");

        state.apply(&MapEvent::BoundaryHover { boundary: Some(boundary("53703")), points: vec![] });
        let DashboardView::Selected(s) = state.view() else { panic!("selection should win") };
        assert_eq!(s.boundary.code(), Some("53704"));
    }

    #[test]
    fn empty_list_renders_message() {
        let mut state = DashboardState::new();
        state.apply(&MapEvent::BoundaryClick { boundary: boundary("53703"), points: vec![] });
        assert!(state.render_text().contains(NO_PLANTS_MESSAGE));
    }

    #[test]
    fn expanded_plant_shows_details() {
        let mut state = DashboardState::new();
        state.apply(&MapEvent::BoundaryClick { boundary: boundary("53703"), points: vec![plant("Capitol Solar")] });
        state.toggle_plant(0);
        let text = state.render_text();
        assert!(text.contains("Capitol Solar"));
        assert!(text.contains("Installed MW: 2.5"));
        assert!(text.contains("Utility: N/A"));

        state.toggle_plant(0);
        assert!(!state.render_text().contains("Installed MW"));
    }

    #[test]
    fn failed_search_sets_notice() {
        let mut state = DashboardState::new();
        state.apply(&MapEvent::SearchFailed { code: "99999".into(), attempts: 10 });
        assert_eq!(state.notice(), Some("ZIP code 99999 not found."));
    }

    #[test]
    fn zip_form_trims_and_rejects_blank() {
        let mut form = ZipForm::default();
        form.set_input("   ");
        assert_eq!(form.submit(), None);
        form.set_input(" 53703 ");
        assert_eq!(form.submit().as_deref(), Some("53703"));
    }
}
