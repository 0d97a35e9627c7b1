//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::io::Write;

use app_lib::{create_dashboard_state, DashboardConfig, DashboardState};
use dataset::{AgeBands, Dataset, Record, RegionTable, Season};

/// Test harness owning a fully computed dashboard.
pub struct TestHarness {
    pub state: DashboardState,
}

impl TestHarness {
    /// Dashboard over the shopping fixture with the default config.
    pub fn new() -> Self {
        Self::with_config(&DashboardConfig::default())
    }

    pub fn with_config(config: &DashboardConfig) -> Self {
        Self::with_records(ShoppingFixture::records(), config)
    }

    pub fn with_records(records: Vec<Record>, config: &DashboardConfig) -> Self {
        let regions = RegionTable::us_states();
        let dataset = Dataset::load(records, &regions, &AgeBands::standard());
        TestHarness {
            state: create_dashboard_state(dataset, regions, config).expect("dashboard state"),
        }
    }
}

/// A small slice of shopping trends data.
pub struct ShoppingFixture;

impl ShoppingFixture {
    /// (gender, location, season, item, category, age, rating, amount, previous)
    pub fn rows() -> Vec<(&'static str, &'static str, Season, &'static str, &'static str, u32, f64, f64, u32)> {
        vec![
            ("Male", "California", Season::Winter, "Coat", "Outerwear", 32, 4.0, 120.0, 10),
            ("Female", "California", Season::Winter, "Boots", "Footwear", 47, 2.0, 80.0, 3),
            ("Male", "Texas", Season::Fall, "Hat", "Accessories", 21, 3.3, 25.0, 41),
            ("Female", "Texas", Season::Fall, "Hat", "Clothing", 23, 4.1, 30.0, 7),
            ("Female", "New York", Season::Spring, "Blouse", "Clothing", 35, 4.9, 55.0, 18),
            ("Male", "New York", Season::Spring, "Sneakers", "Footwear", 61, 2.6, 90.0, 22),
            ("Female", "Atlantis", Season::Fall, "Scarf", "Accessories", 80, 3.0, 15.0, 1),
        ]
    }

    pub fn records() -> Vec<Record> {
        Self::rows()
            .into_iter()
            .map(|(gender, location, season, item, category, age, rating, amount, previous)| {
                Record::new(gender, location, season, item, category)
                    .with_age(age)
                    .with_rating(rating)
                    .with_amount(amount)
                    .with_previous_purchases(previous)
            })
            .collect()
    }

    /// The fixture as a CSV file in the source column layout.
    pub fn write_csv(file: &mut impl Write) {
        writeln!(
            file,
            "Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),Location,Size,Season,Review Rating,Previous Purchases"
        )
        .unwrap();
        for (i, (gender, location, season, item, category, age, rating, amount, previous)) in
            Self::rows().into_iter().enumerate()
        {
            writeln!(
                file,
                "{},{},{},{},{},{},{},M,{},{},{}",
                i + 1,
                age,
                gender,
                item,
                category,
                amount,
                location,
                season,
                rating,
                previous
            )
            .unwrap();
        }
    }
}
