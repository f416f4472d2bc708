//! Packages shown on the pricing page.
//!
//! The catalog is configuration data: the bundled `catalog/packages.toml` is
//! compiled in and `CATALOG_PATH` can point at a replacement file.

use crate::error::{CatalogError, CheckoutError};
use log::info;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

const BUNDLED_CATALOG: &str = include_str!("../catalog/packages.toml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub name: String,
    /// Whole euros.
    pub price: u32,
    /// Running time in seconds.
    pub duration: u32,
    pub revisions: u32,
    pub delivery_days: u32,
    pub description: String,
}

impl Offering {
    pub fn amount_minor_units(&self) -> i64 {
        i64::from(self.price) * 100
    }

    /// First of five milestone payments, formatted with two decimals.
    pub fn milestone_amount(&self) -> String {
        let minor = self.amount_minor_units() / 5;
        format!("{}.{:02}", minor / 100, minor % 100)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let reason = if self.name.trim().is_empty() {
            "name is empty"
        } else if self.price == 0 {
            "price must be positive"
        } else if self.duration == 0 {
            "duration must be positive"
        } else {
            return Ok(());
        };
        Err(CatalogError::Invalid {
            name: self.name.clone(),
            reason,
        })
    }
}

/// On-disk shape. Only `Catalog::from_toml_str` turns it into a `Catalog`.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    features: Vec<String>,
    packages: Vec<Offering>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    features: Vec<String>,
    packages: Vec<Offering>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(raw)?;
        let catalog = Catalog {
            features: file.features,
            packages: file.packages,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&raw)?;
        info!(
            "Loaded {} packages from {}",
            catalog.packages.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// `path` when configured, the bundled catalog otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.packages.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for offering in &self.packages {
            offering.validate()?;
            if !seen.insert(offering.name.as_str()) {
                return Err(CatalogError::Duplicate(offering.name.clone()));
            }
        }
        Ok(())
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.packages
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn get(&self, name: &str) -> Option<&Offering> {
        self.packages.iter().find(|o| o.name == name)
    }

    /// Catalogs are never empty once validated.
    pub fn first(&self) -> &Offering {
        &self.packages[0]
    }

    pub fn require(&self, name: &str) -> Result<&Offering, CheckoutError> {
        self.get(name)
            .ok_or_else(|| CheckoutError::UnknownOffering(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_keeps_display_order() {
        let catalog = Catalog::bundled().unwrap();
        let names: Vec<&str> = catalog.offerings().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Basic", "Standard", "Premium"]);
        assert_eq!(
            catalog.offerings().len().to_string(),
            env!("CATALOG_PACKAGE_COUNT")
        );
        assert_eq!(catalog.features().len(), 6);
    }

    #[test]
    fn minor_units_are_exact_for_every_offering() {
        let catalog = Catalog::bundled().unwrap();
        for offering in catalog.offerings() {
            assert_eq!(offering.amount_minor_units(), i64::from(offering.price) * 100);
        }
        assert_eq!(catalog.get("Standard").unwrap().amount_minor_units(), 389_300);
    }

    #[test]
    fn milestone_is_a_fifth_of_the_price() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.get("Basic").unwrap().milestone_amount(), "718.60");
        assert_eq!(catalog.get("Standard").unwrap().milestone_amount(), "778.60");
        assert_eq!(catalog.get("Premium").unwrap().milestone_amount(), "858.40");
    }

    #[test]
    fn zero_price_is_rejected() {
        let raw = r#"
            [[packages]]
            name = "Free"
            price = 0
            duration = 30
            revisions = 1
            delivery_days = 7
            description = "nothing"
        "#;
        let err = Catalog::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { reason: "price must be positive", .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let one = r#"
            [[packages]]
            name = "Basic"
            price = 10
            duration = 30
            revisions = 1
            delivery_days = 7
            description = "x"
        "#;
        let raw = format!("{one}\n{one}");
        let err = Catalog::from_toml_str(&raw).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(name) if name == "Basic"));
    }

    #[test]
    fn replacement_file_overrides_bundled() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            features = ["Storyboard"]

            [[packages]]
            name = "Teaser"
            price = 990
            duration = 15
            revisions = 1
            delivery_days = 10
            description = "A 15-sec teaser."
            "#
        )
        .unwrap();

        let catalog = Catalog::load(Some(file.path())).unwrap();
        assert_eq!(catalog.first().name, "Teaser");
        assert_eq!(catalog.features(), ["Storyboard".to_string()]);
        assert!(catalog.get("Basic").is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Catalog::load(Some(Path::new("/nonexistent/packages.toml"))).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::from_toml_str("packages = []").unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn features_default_and_first_is_the_top_package() {
        let raw = r#"
            [[packages]]
            name = "Only"
            price = 100
            duration = 30
            revisions = 1
            delivery_days = 7
            description = "x"
        "#;
        let catalog = Catalog::from_toml_str(raw).unwrap();
        assert!(catalog.features().is_empty());
        assert_eq!(catalog.first(), &catalog.offerings()[0]);
        assert_eq!(catalog.first().name, "Only");
    }
}
