//! Detail-page field extraction.
//!
//! Each of the six fields is a label anchored to a positionally adjacent
//! value element; the adjacency differs by field kind. Lookups are
//! independently fault-isolated: a failed lookup leaves that field at the
//! sentinel and never disturbs the others.

use tracing::debug;

use crate::browser::{Browser, Element, Locator};
use crate::error::ScrapeError;
use crate::record::DetailFields;
use crate::scrape::wait::WaitStrategy;

/// How a field's value element sits relative to its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjacency {
    /// `<span>` directly following the label, used by the date fields.
    Sibling,
    /// `<span>` nested in a following `<div>`, used by enrollment.
    NestedSibling,
    /// `<span>` inside the site's classification widget, used by the
    /// categorical fields.
    EnumWidget,
}

#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    label: &'static str,
    adjacency: Adjacency,
}

const FIELDS: [FieldSpec; 6] = [
    FieldSpec { label: "Study Start", adjacency: Adjacency::Sibling },
    FieldSpec { label: "Primary Completion", adjacency: Adjacency::Sibling },
    FieldSpec { label: "Study Completion", adjacency: Adjacency::Sibling },
    FieldSpec { label: "Enrollment", adjacency: Adjacency::NestedSibling },
    FieldSpec { label: "Study Type", adjacency: Adjacency::EnumWidget },
    FieldSpec { label: "Phase", adjacency: Adjacency::EnumWidget },
];

impl FieldSpec {
    fn locator(&self) -> Locator {
        let anchor = format!("//div[contains(text(), '{}')]", self.label);
        let suffix = match self.adjacency {
            Adjacency::Sibling => "/following-sibling::span",
            Adjacency::NestedSibling => "/following-sibling::div/span",
            Adjacency::EnumWidget => "/following-sibling::ctg-enum-value/span",
        };
        Locator::xpath(format!("{anchor}{suffix}"))
    }
}

/// One fault-isolated lookup: any failure collapses to `None`.
async fn lookup_field<B: Browser>(browser: &B, spec: &FieldSpec) -> Option<String> {
    let value = match browser.find(&spec.locator()).await {
        Ok(element) => element.text().await,
        Err(err) => Err(err),
    };
    match value {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(field = spec.label, error = %err, "field lookup failed");
            None
        }
    }
}

/// Navigates to `detail_url` and extracts the six-field schema.
///
/// Navigation failures are fatal; every per-field failure downgrades that
/// field to the sentinel.
pub(crate) async fn extract_fields<B: Browser>(
    browser: &B,
    detail_url: &str,
    settle: &WaitStrategy,
) -> Result<DetailFields, ScrapeError> {
    browser.navigate(detail_url).await?;
    settle.settle(browser, &FIELDS[0].locator()).await;

    let mut fields = DetailFields::default();
    let slots: [&mut String; 6] = [
        &mut fields.study_start,
        &mut fields.primary_completion,
        &mut fields.study_completion,
        &mut fields.enrollment,
        &mut fields.study_type,
        &mut fields.phase,
    ];
    for (spec, slot) in FIELDS.iter().zip(slots) {
        if let Some(value) = lookup_field(browser, spec).await {
            *slot = value;
        }
    }
    Ok(fields)
}
