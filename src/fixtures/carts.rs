//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in the order they were added
    pub items: Vec<CartLineFixture>,
}

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key
    pub product: String,

    /// Units of the product
    #[serde(default = "one")]
    pub quantity: u32,

    /// Whether the line starts selected
    #[serde(default = "selected")]
    pub selected: bool,
}

fn one() -> u32 {
    1
}

fn selected() -> bool {
    true
}
