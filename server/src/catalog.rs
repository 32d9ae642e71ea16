use application::transfer::{ItemSeedDto, VenueDto};
use error_stack::{Report, ResultExt};
use kernel::KernelError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct VenueEntry {
    name: String,
    color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemEntry {
    id: String,
    name: String,
    category: String,
    #[serde(default)]
    description: Option<String>,
    quantity: i32,
}

/// Venues and loanable items the deployment starts with.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    venues: Vec<VenueEntry>,
    items: Vec<ItemEntry>,
}

impl Catalog {
    pub fn load(path: Option<&Path>) -> error_stack::Result<Self, KernelError> {
        let Some(path) = path else {
            return Ok(Self::builtin());
        };
        let raw = std::fs::read_to_string(path)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("Failed to read catalog {}", path.display()))?;
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Result<Self, Report<KernelError>> {
        serde_json::from_str(raw)
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| "Catalog is not valid JSON")
    }

    pub fn builtin() -> Self {
        let venue = |name: &str, color: &str| VenueEntry {
            name: name.to_string(),
            color: color.to_string(),
        };
        let item = |id: &str, name: &str, category: &str, description: &str, quantity: i32| {
            ItemEntry {
                id: id.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                description: Some(description.to_string()),
                quantity,
            }
        };
        Self {
            venues: vec![
                venue("Conference Room Alpha", "#FF6F00"),
                venue("Innovation Hub", "#00ACC1"),
                venue("Synergy Space", "#5E35B1"),
                venue("Focus Booth Zen", "#43A047"),
            ],
            items: vec![
                item(
                    "lap-recorder",
                    "Lap Recorder",
                    "Audio Equipment",
                    "High-quality digital voice recorder, perfect for interviews and lectures. Comes with a lavalier microphone.",
                    2,
                ),
                item(
                    "flash-guard",
                    "Flash Guard",
                    "Photography",
                    "Diffuser for on-camera flash to soften light and reduce harsh shadows.",
                    1,
                ),
                item(
                    "laminator",
                    "Laminator",
                    "Office Equipment",
                    "A4 size laminating machine for preserving documents.",
                    1,
                ),
                item(
                    "projector",
                    "Projector",
                    "Electronics",
                    "Portable HD projector with HDMI and USB inputs. Includes remote and power cable.",
                    1,
                ),
                item(
                    "ippt-chip-box",
                    "IPPT Chip Box (With Chips)",
                    "Training Equipment",
                    "A full box of electronic timing chips for IPPT.",
                    1,
                ),
            ],
        }
    }

    pub fn venues(&self) -> Vec<VenueDto> {
        self.venues
            .iter()
            .map(|entry| VenueDto {
                name: entry.name.clone(),
                color: entry.color.clone(),
            })
            .collect()
    }

    pub fn items(&self) -> Vec<ItemSeedDto> {
        self.items
            .iter()
            .map(|entry| ItemSeedDto {
                id: entry.id.clone(),
                name: entry.name.clone(),
                category: entry.category.clone(),
                description: entry.description.clone(),
                quantity: entry.quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builtin_catalog() {
        let catalog = Catalog::builtin();
        let venues = catalog.venues();
        assert_eq!(venues.len(), 4);
        assert_eq!(venues[0].name, "Conference Room Alpha");
        assert_eq!(venues[0].color, "#FF6F00");

        let items = catalog.items();
        assert_eq!(items.len(), 5);
        let recorder = items.iter().find(|item| item.id == "lap-recorder").unwrap();
        assert_eq!(recorder.quantity, 2);
    }

    #[test]
    fn parses_json_catalog() {
        let raw = r##"{
            "venues": [{"name": "Annex", "color": "#123456"}],
            "items": [{"id": "tripod", "name": "Tripod", "category": "Photography", "quantity": 3}]
        }"##;
        let catalog = Catalog::parse(raw).unwrap();
        assert_eq!(
            catalog.venues(),
            vec![VenueDto {
                name: "Annex".to_string(),
                color: "#123456".to_string()
            }]
        );
        let items = catalog.items();
        assert_eq!(items[0].description, None);
        assert_eq!(items[0].quantity, 3);

        let err = Catalog::parse("{").unwrap_err();
        assert_eq!(*err.current_context(), KernelError::Internal);
    }
}
