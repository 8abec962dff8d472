//! Mapping of provider breeds into the shapes we serve.

use crate::types::{Breed, BreedOption, BreedTableRow, RawBreed};

const SUBTITLE_SEPARATOR: &str = " • ";

/// First two temperament traits, falling back to the origin.
///
/// ```
/// # use catbrowse_catalog::normalize::subtitle;
/// assert_eq!(subtitle(Some("Active, Energetic, Independent"), None), "Active • Energetic");
/// assert_eq!(subtitle(Some(" , "), Some("Egypt")), "Egypt");
/// assert_eq!(subtitle(None, None), "");
/// ```
pub fn subtitle(temperament: Option<&str>, origin: Option<&str>) -> String {
    let traits = temperament
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(2)
        .collect::<Vec<_>>();

    if !traits.is_empty() {
        return traits.join(SUBTITLE_SEPARATOR);
    }
    origin.unwrap_or_default().to_string()
}

impl From<&RawBreed> for Breed {
    fn from(raw: &RawBreed) -> Self {
        Breed {
            id: raw.id.clone(),
            name: raw.name.clone(),
            subtitle: subtitle(raw.temperament.as_deref(), raw.origin.as_deref()),
            image: None,
            origin: raw.origin.clone(),
            temperament: raw.temperament.clone(),
            description: raw.description.clone(),
            life_span: raw.life_span.clone(),
            wikipedia_url: raw.wikipedia_url.clone(),
            alt_names: raw.alt_names.clone(),
            weight_metric: raw.weight.as_ref().and_then(|w| w.metric.clone()),
            intelligence: raw.intelligence,
            affection_level: raw.affection_level,
            energy_level: raw.energy_level,
            adaptability: raw.adaptability,
            child_friendly: raw.child_friendly,
            dog_friendly: raw.dog_friendly,
            stranger_friendly: raw.stranger_friendly,
            rare: raw.rare,
        }
    }
}

impl From<&RawBreed> for BreedOption {
    fn from(raw: &RawBreed) -> Self {
        BreedOption {
            id: raw.id.clone(),
            label: raw.name.clone(),
        }
    }
}

impl From<&RawBreed> for BreedTableRow {
    fn from(raw: &RawBreed) -> Self {
        BreedTableRow {
            id: raw.id.clone(),
            name: raw.name.clone(),
            origin: raw.origin.clone(),
            intelligence: raw.intelligence,
            affection_level: raw.affection_level,
            energy_level: raw.energy_level,
            child_friendly: raw.child_friendly,
            dog_friendly: raw.dog_friendly,
            rare: raw.rare,
            life_span: raw.life_span.clone(),
            weight_metric: raw.weight.as_ref().and_then(|w| w.metric.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::{BreedId, RawWeight};

    fn raw_breed() -> RawBreed {
        serde_json::from_value(serde_json::json!({
            "id": "beng",
            "name": "Bengal",
            "origin": "United States",
            "temperament": "Alert, Agile, Energetic, Demanding, Intelligent",
            "life_span": "12 - 15",
            "weight": { "metric": "3 - 7", "imperial": "6 - 12" },
            "intelligence": 5,
            "affection_level": 5,
            "energy_level": 5
        }))
        .unwrap()
    }

    #[test]
    fn subtitle_uses_first_two_traits() {
        assert_eq!(
            subtitle(Some("Alert, Agile, Energetic"), Some("United States")),
            "Alert • Agile"
        );
        assert_eq!(subtitle(Some("Calm"), Some("Thailand")), "Calm");
    }

    #[test]
    fn subtitle_falls_back_to_origin_then_empty() {
        assert_eq!(subtitle(Some(""), Some("Thailand")), "Thailand");
        assert_eq!(subtitle(None, Some("Thailand")), "Thailand");
        assert_eq!(subtitle(Some(",,"), None), "");
    }

    #[test]
    fn breed_flattens_weight_and_has_no_image() {
        let breed = Breed::from(&raw_breed());
        assert_eq!(breed.id, BreedId::from("beng"));
        assert_eq!(breed.subtitle, "Alert • Agile");
        assert_eq!(breed.weight_metric.as_deref(), Some("3 - 7"));
        assert_eq!(breed.image, None);
        assert_eq!(breed.intelligence, Some(5));
    }

    #[test]
    fn table_row_and_option() {
        let mut raw = raw_breed();
        raw.weight = Some(RawWeight::default());
        let row = BreedTableRow::from(&raw);
        assert_eq!(row.name, "Bengal");
        assert_eq!(row.weight_metric, None);

        let option = BreedOption::from(&raw);
        assert_eq!(option, BreedOption {
            id: BreedId::from("beng"),
            label: "Bengal".to_string(),
        });
    }
}
