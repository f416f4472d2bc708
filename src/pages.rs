//! Server-rendered HTML for the pricing and confirmation pages.

use crate::{catalog::Catalog, catalog::Offering, orchestrator::Notification};
use serde::Serialize;
use tera::{Context, Tera};

#[derive(Debug, Clone, Serialize)]
pub struct OfferingCard {
    pub name: String,
    pub price: u32,
    pub duration: u32,
    pub revisions: u32,
    pub delivery_days: u32,
    pub description: String,
    pub milestone: String,
    pub selected: bool,
    pub in_flight: bool,
}

impl OfferingCard {
    fn new(offering: &Offering, selected: bool, in_flight: bool) -> Self {
        Self {
            name: offering.name.clone(),
            price: offering.price,
            duration: offering.duration,
            revisions: offering.revisions,
            delivery_days: offering.delivery_days,
            description: offering.description.clone(),
            milestone: offering.milestone_amount(),
            selected,
            in_flight,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PricingView {
    pub page_id: String,
    pub cards: Vec<OfferingCard>,
    pub selected: OfferingCard,
    pub features: Vec<String>,
    pub notification: Option<Notification>,
}

impl PricingView {
    /// `selected` falls back to the first offering when it names nothing in
    /// the catalog.
    pub fn new(
        catalog: &Catalog,
        page_id: &str,
        selected: Option<&str>,
        in_flight: &[String],
        notification: Option<Notification>,
    ) -> Self {
        let selected = selected
            .and_then(|name| catalog.get(name))
            .unwrap_or_else(|| catalog.first());
        let busy = |o: &Offering| in_flight.iter().any(|name| *name == o.name);

        let cards = catalog
            .offerings()
            .iter()
            .map(|o| OfferingCard::new(o, o.name == selected.name, busy(o)))
            .collect();

        Self {
            page_id: page_id.to_string(),
            cards,
            selected: OfferingCard::new(selected, true, busy(selected)),
            features: catalog.features().to_vec(),
            notification,
        }
    }
}

#[derive(Clone)]
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../templates/base.html")),
            ("pricing.html", include_str!("../templates/pricing.html")),
            ("success.html", include_str!("../templates/success.html")),
            ("cancel.html", include_str!("../templates/cancel.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn pricing(&self, view: &PricingView) -> Result<String, tera::Error> {
        self.tera
            .render("pricing.html", &Context::from_serialize(view)?)
    }

    pub fn success(&self, home_href: &str) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("home_href", home_href);
        self.tera.render("success.html", &context)
    }

    pub fn cancel(&self) -> Result<String, tera::Error> {
        self.tera.render("cancel.html", &Context::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Pages {
        Pages::new().unwrap()
    }

    #[test]
    fn pricing_lists_every_package() {
        let catalog = Catalog::bundled().unwrap();
        let view = PricingView::new(&catalog, "p1", None, &[], None);
        let html = pages().pricing(&view).unwrap();

        for offering in catalog.offerings() {
            assert!(html.contains(&format!("&euro;{}", offering.price)));
            assert!(html.contains(&format!("{}-SEC PRODUCT VIDEO", offering.duration)));
        }
        assert!(html.contains("Pay per milestone starting with &euro;718.60"));
        assert!(html.contains("Continue to Checkout"));
        assert!(html.contains("Offers hourly rates"));
    }

    #[test]
    fn unknown_selection_falls_back_to_first() {
        let catalog = Catalog::bundled().unwrap();
        let view = PricingView::new(&catalog, "p1", Some("Gold"), &[], None);
        assert_eq!(view.selected.name, "Basic");
        assert!(view.cards[0].selected);
    }

    #[test]
    fn in_flight_offering_is_disabled_alone() {
        let catalog = Catalog::bundled().unwrap();
        let busy = vec!["Standard".to_string()];
        let view = PricingView::new(&catalog, "p1", Some("Standard"), &busy, None);
        assert!(view.selected.in_flight);
        let flags: Vec<bool> = view.cards.iter().map(|c| c.in_flight).collect();
        assert_eq!(flags, [false, true, false]);

        let html = pages().pricing(&view).unwrap();
        assert!(html.contains("Processing..."));
    }

    #[test]
    fn notification_text_is_escaped() {
        let catalog = Catalog::bundled().unwrap();
        let view = PricingView::new(
            &catalog,
            "p1",
            None,
            &[],
            Some(Notification::checkout_error("<script>alert(1)</script>")),
        );
        let html = pages().pricing(&view).unwrap();
        assert!(html.contains("Checkout Error"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn confirmation_pages_render() {
        let success = pages().success("https://videos.example.com").unwrap();
        assert!(success.contains("Payment Successful!"));
        assert!(success.contains("Return to Home"));
        assert!(success.contains("videos.example.com"));

        let cancel = pages().cancel().unwrap();
        assert!(cancel.contains("Payment Cancelled"));
        assert!(cancel.contains("No charges were made."));
    }
}
