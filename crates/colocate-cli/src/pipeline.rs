//! Stage handlers for the CLI.
//!
//! Each stage reads its input from the staging directory (or takes it from the
//! previous stage in `run`), produces its output completely, and writes it
//! back before the next stage starts. Any error aborts the run.

use anyhow::Context;
use colocate_core::{
    correlate, summarize, AppConfig, CategorySet, CorrelationEntry, Place, PoiCollection, PoiRole,
};
use colocate_geocoder::{Geocoder, RetryPolicy};
use colocate_store::StagingDir;

use crate::prompt::Prompter;
use crate::report::render_summary;
use crate::resolve::{resolve_fixed, resolve_interactive, DEFAULT_PLACE};
use crate::search::search_category;

/// Whether the operator is prompted or fixed defaults are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Interactive,
    Fixed,
}

/// The three staged POI collections, in role order.
pub(crate) struct PoiDataset {
    pub(crate) anchor: PoiCollection,
    pub(crate) secondary: PoiCollection,
    pub(crate) tertiary: PoiCollection,
}

impl PoiDataset {
    pub(crate) fn categories(&self) -> CategorySet {
        CategorySet::new(
            self.anchor.category.clone(),
            self.secondary.category.clone(),
            self.tertiary.category.clone(),
        )
    }

    pub(crate) fn load(staging: &StagingDir) -> anyhow::Result<Self> {
        let read = |role: PoiRole| {
            staging
                .read_pois(role)
                .with_context(|| format!("loading staged {role} POIs; run `colocate search` first"))
        };
        Ok(Self {
            anchor: read(PoiRole::Anchor)?,
            secondary: read(PoiRole::Secondary)?,
            tertiary: read(PoiRole::Tertiary)?,
        })
    }
}

/// Resolves the anchor place and stages it.
pub(crate) async fn resolve_stage<G, P>(
    geocoder: &G,
    retry: &RetryPolicy,
    prompter: &mut P,
    mode: InputMode,
    place_query: Option<&str>,
    config: &AppConfig,
    staging: &StagingDir,
) -> anyhow::Result<Place>
where
    G: Geocoder,
    P: Prompter,
{
    let place = match mode {
        InputMode::Interactive => {
            resolve_interactive(geocoder, retry, prompter, config.default_radius_miles).await?
        }
        InputMode::Fixed => {
            let query = place_query.unwrap_or(DEFAULT_PLACE);
            resolve_fixed(geocoder, retry, query, config.default_radius_miles).await?
        }
    };

    let path = staging.write_place(&place)?;
    tracing::info!(
        place = %place.display_name,
        add_bbox = place.add_bbox,
        radius_miles = place.radius_miles,
        path = %path.display(),
        "anchor place staged"
    );
    Ok(place)
}

/// Picks the three categories: explicit values win, otherwise the operator is
/// asked (empty answer takes the default), otherwise the defaults are used.
pub(crate) fn choose_categories<P: Prompter>(
    prompter: &mut P,
    mode: InputMode,
    explicit: Option<Vec<String>>,
) -> anyhow::Result<CategorySet> {
    if let Some(values) = explicit {
        let [anchor, secondary, tertiary]: [String; 3] = values
            .try_into()
            .map_err(|v: Vec<String>| anyhow::anyhow!("expected 3 categories, got {}", v.len()))?;
        return Ok(CategorySet::new(anchor, secondary, tertiary));
    }
    if mode == InputMode::Fixed {
        return Ok(CategorySet::default());
    }

    let mut chosen = Vec::with_capacity(3);
    for (i, role) in PoiRole::ALL.into_iter().enumerate() {
        let default = CategorySet::default_for(role);
        let Some(answer) =
            prompter.ask(&format!("Input category {} [default: {default}]:  ", i + 1))?
        else {
            anyhow::bail!("console input closed before categories were chosen");
        };
        let answer = answer.trim();
        chosen.push(if answer.is_empty() {
            default.to_owned()
        } else {
            answer.to_owned()
        });
    }
    let [anchor, secondary, tertiary]: [String; 3] = chosen
        .try_into()
        .map_err(|_| anyhow::anyhow!("category prompt produced the wrong count"))?;
    Ok(CategorySet::new(anchor, secondary, tertiary))
}

/// Searches every category around `place`, staging each collection as soon as
/// it is fetched.
pub(crate) async fn search_stage<G: Geocoder>(
    geocoder: &G,
    retry: &RetryPolicy,
    categories: &CategorySet,
    place: &Place,
    config: &AppConfig,
    staging: &StagingDir,
) -> anyhow::Result<PoiDataset> {
    let mut collections = Vec::with_capacity(3);
    for role in PoiRole::ALL {
        let category = categories.get(role);
        let collection = search_category(geocoder, retry, category, place, config.result_limit)
            .await
            .with_context(|| format!("searching {role} category '{category}'"))?;
        let path = staging.write_pois(role, &collection)?;
        tracing::info!(
            %role,
            category,
            records = collection.records.len(),
            path = %path.display(),
            "POI collection staged"
        );
        collections.push(collection);
    }

    let mut collections = collections.into_iter();
    match (collections.next(), collections.next(), collections.next()) {
        (Some(anchor), Some(secondary), Some(tertiary)) => Ok(PoiDataset {
            anchor,
            secondary,
            tertiary,
        }),
        _ => anyhow::bail!("search produced fewer than three collections"),
    }
}

/// Correlates a POI dataset and stages the result.
pub(crate) fn correlate_stage(
    dataset: &PoiDataset,
    radius_miles: f64,
    staging: &StagingDir,
) -> anyhow::Result<Vec<CorrelationEntry>> {
    let entries = correlate(
        &dataset.anchor.records,
        &dataset.secondary.records,
        &dataset.tertiary.records,
        radius_miles,
    );
    let path = staging.write_correlation(&entries)?;
    tracing::info!(entries = entries.len(), path = %path.display(), "correlation staged");
    Ok(entries)
}

fn category_in(entries: &[CorrelationEntry], role: PoiRole) -> Option<String> {
    match role {
        PoiRole::Anchor => entries.first().map(|e| e.anchor.category.clone()),
        PoiRole::Secondary => entries
            .iter()
            .find_map(|e| e.secondary.first())
            .map(|m| m.record.category.clone()),
        PoiRole::Tertiary => entries
            .iter()
            .find_map(|e| e.tertiary.first())
            .map(|m| m.record.category.clone()),
    }
}

/// Category names for a staged correlation.
///
/// Read from the entries themselves; the staged POI files are consulted only
/// when some role has no match to name it, and defaults fill what is left.
pub(crate) fn report_categories(entries: &[CorrelationEntry], staging: &StagingDir) -> CategorySet {
    let [anchor, secondary, tertiary] = PoiRole::ALL.map(|role| category_in(entries, role));
    if let (Some(anchor), Some(secondary), Some(tertiary)) = (&anchor, &secondary, &tertiary) {
        return CategorySet::new(anchor.clone(), secondary.clone(), tertiary.clone());
    }
    match PoiDataset::load(staging) {
        Ok(dataset) => dataset.categories(),
        Err(err) => {
            tracing::debug!(error = %err, "staged POI files unavailable; using default category names");
            let or_default = |found: Option<String>, role| {
                found.unwrap_or_else(|| CategorySet::default_for(role).to_owned())
            };
            CategorySet::new(
                or_default(anchor, PoiRole::Anchor),
                or_default(secondary, PoiRole::Secondary),
                or_default(tertiary, PoiRole::Tertiary),
            )
        }
    }
}

/// Ranks correlation output and renders the report text.
pub(crate) fn report_stage(
    entries: &[CorrelationEntry],
    categories: &CategorySet,
    top_n: usize,
) -> String {
    render_summary(&summarize(entries, top_n), categories)
}
