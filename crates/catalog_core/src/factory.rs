use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::item::Item;

const ADJECTIVES: &[&str] = &[
    "Daily", "Advanced", "Pure", "Organic", "Essential", "Complete", "Natural", "Active",
];
const PRODUCTS: &[&str] = &[
    "Multivitamin", "Vitamin C", "Vitamin D", "Omega-3", "Protein Powder", "Magnesium",
    "Probiotic", "Zinc", "Iron Complex", "Calcium",
];
const CATEGORIES: &[&str] = &["Vitamins", "Supplements", "Minerals", "Sports Nutrition"];
const IMAGE_BASE: &str = "https://images.example.com/products";
const DESCRIPTIONS: &[&str] = &[
    "Supports overall wellbeing.",
    "Formulated for daily use.",
    "Sourced from sustainable farms.",
    "Third-party tested for purity.",
    "Easy to swallow tablets.",
];

/// Produces valid synthetic items for demos and tests.
pub struct ItemFactory {
    rng: StdRng,
}

impl ItemFactory {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn item(&mut self) -> Item {
        let adjective = pick(&mut self.rng, ADJECTIVES);
        let product = pick(&mut self.rng, PRODUCTS);
        let name = format!("{adjective} {product}");
        let cents: u32 = self.rng.random_range(499..=9999);
        let image = format!(
            "{IMAGE_BASE}/{}.jpg",
            crate::sanitize::sanitize_filename(&name)
        );
        Item::builder()
            .name(name)
            .amount(f64::from(cents) / 100.0)
            .category(pick(&mut self.rng, CATEGORIES))
            .description(pick(&mut self.rng, DESCRIPTIONS))
            .image_path(image)
            .build()
    }

    pub fn items(&mut self, count: usize) -> Vec<Item> {
        (0..count).map(|_| self.item()).collect()
    }
}

impl Default for ItemFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(rng: &mut StdRng, choices: &[&'static str]) -> &'static str {
    choices.choose(rng).copied().unwrap_or("Generic")
}
