//! Anchor resolution: free-form place text to a confirmed [`Place`].

use anyhow::{bail, Context};
use colocate_core::Place;
use colocate_geocoder::{Geocoder, RetryPolicy};

use crate::prompt::Prompter;

/// Place geocoded in non-interactive mode when none is given.
pub(crate) const DEFAULT_PLACE: &str = "cupertino, california";

const LOCATION_PROMPT: &str = "Input location [format: city, state]:  ";
const CONFIRM_PROMPT: &str = "Is this the correct location? (y/n):  ";
const NOT_FOUND: &str = "Location not found.";
const CONFIRMED: &str = "Location confirmed. Continuing...";
const REPROMPT: &str = "Retrying... redo your location input...";

/// Asks the operator for a place until a geocoded result is confirmed.
///
/// There is no attempt cap; the loop ends on confirmation, on a fatal
/// geocoder error, or when the console input is closed.
pub(crate) async fn resolve_interactive<G, P>(
    geocoder: &G,
    retry: &RetryPolicy,
    prompter: &mut P,
    default_radius_miles: f64,
) -> anyhow::Result<Place>
where
    G: Geocoder,
    P: Prompter,
{
    loop {
        let Some(input) = prompter.ask(LOCATION_PROMPT)? else {
            bail!("console input closed before a location was confirmed");
        };
        let query = input.trim();

        let hit = if query.is_empty() {
            None
        } else {
            retry.run("geocode", || geocoder.geocode(query)).await?
        };

        match hit {
            Some(location) => {
                prompter.tell(&location.address)?;
                prompter.tell(&format!(
                    "{} {}",
                    location.coordinate.lat, location.coordinate.lon
                ))?;
                let Some(answer) = prompter.ask(CONFIRM_PROMPT)? else {
                    bail!("console input closed before a location was confirmed");
                };
                if answer.trim().eq_ignore_ascii_case("y") {
                    prompter.tell(CONFIRMED)?;
                    tracing::info!(query, address = %location.address, "anchor location confirmed");
                    return Ok(Place::from_geocoded(location, default_radius_miles));
                }
                tracing::debug!(query, "operator rejected geocoded location");
            }
            None => {
                tracing::debug!(query, "geocoder found no match");
                prompter.tell(NOT_FOUND)?;
            }
        }
        prompter.tell(REPROMPT)?;
    }
}

/// Geocodes `query` once (retrying timeouts per `retry`) with no operator.
///
/// # Errors
///
/// Fails if the geocoder returns a non-timeout error or finds nothing.
pub(crate) async fn resolve_fixed<G: Geocoder>(
    geocoder: &G,
    retry: &RetryPolicy,
    query: &str,
    default_radius_miles: f64,
) -> anyhow::Result<Place> {
    let location = retry
        .run("geocode", || geocoder.geocode(query))
        .await
        .with_context(|| format!("geocoding '{query}'"))?
        .with_context(|| format!("location not found: '{query}'"))?;

    tracing::info!(
        query,
        address = %location.address,
        lat = location.coordinate.lat,
        lon = location.coordinate.lon,
        "anchor location resolved"
    );
    Ok(Place::from_geocoded(location, default_radius_miles))
}
