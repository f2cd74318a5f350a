//! Static catalog of A/B tests and their variants
//!
//! Four tests run concurrently (factorial design): every session is
//! independently assigned one variant per test. Each variant declares an
//! additive conversion delta that feeds the probability composition.

use serde::{Deserialize, Serialize};

/// The four concurrent tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TestKind {
    /// App icon design (3-way)
    IconDesign,
    /// App description length (2-way)
    DescriptionLength,
    /// Pricing strategy (3-way)
    Pricing,
    /// Screenshot count (2-way)
    ScreenshotCount,
}

impl TestKind {
    /// All tests, in catalog order.
    pub const ALL: [TestKind; 4] = [
        TestKind::IconDesign,
        TestKind::DescriptionLength,
        TestKind::Pricing,
        TestKind::ScreenshotCount,
    ];

    /// Stable test identifier (wire value).
    #[must_use]
    pub fn test_id(self) -> &'static str {
        match self {
            TestKind::IconDesign => "icon_design_001",
            TestKind::DescriptionLength => "description_002",
            TestKind::Pricing => "pricing_003",
            TestKind::ScreenshotCount => "screenshots_004",
        }
    }

    /// Human-readable test name (wire value).
    #[must_use]
    pub fn test_name(self) -> &'static str {
        match self {
            TestKind::IconDesign => "App Icon Design Test",
            TestKind::DescriptionLength => "App Description Length Test",
            TestKind::Pricing => "Pricing Strategy Test",
            TestKind::ScreenshotCount => "Screenshot Count Test",
        }
    }

    /// Declared variant set for this test.
    #[must_use]
    pub fn variants(self) -> &'static [VariantDef] {
        match self {
            TestKind::IconDesign => ICON_DESIGN_VARIANTS,
            TestKind::DescriptionLength => DESCRIPTION_VARIANTS,
            TestKind::Pricing => PRICING_VARIANTS,
            TestKind::ScreenshotCount => SCREENSHOT_VARIANTS,
        }
    }

    /// Look up a variant by key.
    #[must_use]
    pub fn variant(self, key: &str) -> Option<&'static VariantDef> {
        self.variants().iter().find(|v| v.key == key)
    }
}

/// One treatment arm of one test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantDef {
    /// Assignment key stored on sessions
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// Description of the treatment
    pub description: &'static str,
    /// Additive conversion-probability delta
    pub conversion_delta: f64,
}

static ICON_DESIGN_VARIANTS: &[VariantDef] = &[
    VariantDef {
        key: "control",
        name: "Original Icon",
        description: "Current app icon design",
        conversion_delta: 0.0,
    },
    VariantDef {
        key: "variant_a",
        name: "Minimalist Icon",
        description: "Clean, minimalist icon design",
        conversion_delta: 0.02,
    },
    VariantDef {
        key: "variant_b",
        name: "Colorful Icon",
        description: "Bright, colorful icon design",
        conversion_delta: 0.035,
    },
];

static DESCRIPTION_VARIANTS: &[VariantDef] = &[
    VariantDef {
        key: "control",
        name: "Short Description",
        description: "Concise app description (50-100 words)",
        conversion_delta: 0.0,
    },
    VariantDef {
        key: "variant_a",
        name: "Detailed Description",
        description: "Comprehensive app description (200-300 words)",
        conversion_delta: 0.025,
    },
];

static PRICING_VARIANTS: &[VariantDef] = &[
    VariantDef {
        key: "control",
        name: "Free",
        description: "Completely free app",
        conversion_delta: 0.08,
    },
    VariantDef {
        key: "variant_a",
        name: "Freemium",
        description: "Free with in-app purchases",
        conversion_delta: 0.04,
    },
    VariantDef {
        key: "variant_b",
        name: "Paid",
        description: "One-time purchase ($2.99)",
        conversion_delta: 0.0,
    },
];

static SCREENSHOT_VARIANTS: &[VariantDef] = &[
    VariantDef {
        key: "control",
        name: "3 Screenshots",
        description: "App store listing with 3 screenshots",
        conversion_delta: 0.0,
    },
    VariantDef {
        key: "variant_a",
        name: "5 Screenshots",
        description: "App store listing with 5 screenshots",
        conversion_delta: 0.015,
    },
];

/// One row of the `ab_test_variants` output table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRow {
    pub test_id: &'static str,
    pub test_name: &'static str,
    pub variant_key: &'static str,
    pub variant_name: &'static str,
    pub variant_description: &'static str,
}

/// Flatten the catalog into output rows (3+2+3+2 = 10).
#[must_use]
pub fn variant_rows() -> Vec<VariantRow> {
    TestKind::ALL
        .iter()
        .flat_map(|kind| {
            kind.variants().iter().map(|v| VariantRow {
                test_id: kind.test_id(),
                test_name: kind.test_name(),
                variant_key: v.key,
                variant_name: v.name,
                variant_description: v.description,
            })
        })
        .collect()
}
