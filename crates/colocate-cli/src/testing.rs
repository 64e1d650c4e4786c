//! In-memory geocoder and scripted prompter for stage tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;

use colocate_core::{BoundingBox, Coordinate, GeocodedLocation};
use colocate_geocoder::{GeocodeError, Geocoder};
use serde_json::json;

use crate::prompt::Prompter;

type GeocodeReply = Result<Option<GeocodedLocation>, GeocodeError>;
type SearchReply = Result<Vec<GeocodedLocation>, GeocodeError>;

/// Replays queued `geocode` replies in order and serves `search_within` from
/// per-query queues (falling back to a fixed answer once a queue drains).
#[derive(Default)]
pub(crate) struct FakeGeocoder {
    geocode_replies: RefCell<VecDeque<GeocodeReply>>,
    search_replies: RefCell<HashMap<String, VecDeque<SearchReply>>>,
    pub(crate) geocode_calls: RefCell<Vec<String>>,
    pub(crate) search_calls: RefCell<Vec<(String, BoundingBox, u32)>>,
}

impl FakeGeocoder {
    pub(crate) fn push_geocode(&self, reply: GeocodeReply) -> &Self {
        self.geocode_replies.borrow_mut().push_back(reply);
        self
    }

    pub(crate) fn push_search(&self, query: &str, reply: SearchReply) -> &Self {
        self.search_replies
            .borrow_mut()
            .entry(query.to_owned())
            .or_default()
            .push_back(reply);
        self
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodedLocation>, GeocodeError> {
        self.geocode_calls.borrow_mut().push(query.to_owned());
        self.geocode_replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn search_within(
        &self,
        query: &str,
        bbox: &BoundingBox,
        limit: u32,
    ) -> Result<Vec<GeocodedLocation>, GeocodeError> {
        self.search_calls
            .borrow_mut()
            .push((query.to_owned(), *bbox, limit));
        self.search_replies
            .borrow_mut()
            .get_mut(query)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Answers prompts from a script and records everything shown.
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub(crate) asked: Vec<String>,
    pub(crate) told: Vec<String>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_owned()).collect(),
            asked: Vec::new(),
            told: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str) -> io::Result<Option<String>> {
        self.asked.push(message.to_owned());
        Ok(self.answers.pop_front())
    }

    fn tell(&mut self, message: &str) -> io::Result<()> {
        self.told.push(message.to_owned());
        Ok(())
    }
}

pub(crate) fn timeout() -> GeocodeError {
    GeocodeError::Timeout {
        context: "fake".to_owned(),
    }
}

pub(crate) fn location(address: &str, lat: f64, lon: f64) -> GeocodedLocation {
    GeocodedLocation {
        address: address.to_owned(),
        coordinate: Coordinate::new(lat, lon),
        bbox: None,
        raw: json!({ "display_name": address }),
    }
}

pub(crate) fn named(name: &str, lat: f64, lon: f64) -> GeocodedLocation {
    GeocodedLocation {
        address: format!("{name}, Cupertino, California"),
        coordinate: Coordinate::new(lat, lon),
        bbox: None,
        raw: json!({ "name": name }),
    }
}
